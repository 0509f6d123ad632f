//! Reconnecting server-sent-events stream for the browser build.
//!
//! Retry and heartbeat bookkeeping is kept free of browser types so it can be
//! tested natively; only the wasm `Stream` touches `EventSource`.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use std::time::Duration;

use thiserror::Error;

/// Named events the roster stream may emit besides the default `message`.
pub const ROSTER_EVENT: &str = "staff_roster";
pub const PING_EVENT: &str = "ping";

const MIN_HEARTBEAT: Duration = Duration::from_secs(5);
const MIN_RETRY_BASE: Duration = Duration::from_millis(500);
const MIN_RETRY_CEILING: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamOptions {
    pub heartbeat_timeout: Duration,
    pub retry_base: Duration,
    pub retry_max: Duration,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_secs(30),
            retry_base: Duration::from_secs(1),
            retry_max: Duration::from_secs(10),
        }
    }
}

impl StreamOptions {
    pub fn with_heartbeat(heartbeat_timeout: Duration) -> Self {
        Self {
            heartbeat_timeout,
            ..Self::default()
        }
    }

    fn heartbeat(&self) -> Duration {
        self.heartbeat_timeout.max(MIN_HEARTBEAT)
    }
}

/// Doubling reconnect delay, capped, reset after every successful open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backoff {
    base: Duration,
    ceiling: Duration,
    next: Duration,
}

impl Backoff {
    pub fn new(options: &StreamOptions) -> Self {
        let base = options.retry_base.max(MIN_RETRY_BASE);
        let ceiling = options.retry_max.max(MIN_RETRY_CEILING);
        Self {
            base,
            ceiling,
            next: base.min(ceiling),
        }
    }

    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (delay * 2).min(self.ceiling);
        delay
    }

    pub fn reset(&mut self) {
        self.next = self.base.min(self.ceiling);
    }
}

/// True once nothing (not even a ping) has arrived for longer than the
/// heartbeat window.
pub fn heartbeat_expired(options: &StreamOptions, last_event_ms: f64, now_ms: f64) -> bool {
    now_ms - last_event_ms > options.heartbeat().as_millis() as f64
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Opened,
    Frame { event: Option<String>, data: String },
    Dropped(String),
}

impl StreamEvent {
    pub fn is_ping(&self) -> bool {
        matches!(self, Self::Frame { event: Some(name), .. } if name == PING_EVENT)
    }
}

pub type StreamListener = Box<dyn Fn(StreamEvent)>;

#[derive(Debug, Error)]
pub enum SseError {
    #[error("event stream setup failed: {0}")]
    EventSourceInit(String),
    #[error("event streams are not available on this platform")]
    Unsupported,
}

/// Open stream; dropping it closes the connection and stops retries.
pub struct SseHandle {
    #[cfg(target_arch = "wasm32")]
    stream: std::rc::Rc<wasm::Stream>,
}

impl SseHandle {
    pub fn close(&self) {
        #[cfg(target_arch = "wasm32")]
        self.stream.close();
    }
}

impl Drop for SseHandle {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(target_arch = "wasm32")]
pub fn open_stream(
    url: &str,
    options: StreamOptions,
    listener: StreamListener,
) -> Result<SseHandle, SseError> {
    let stream = wasm::Stream::new(url, options, listener)?;
    stream.connect();
    Ok(SseHandle { stream })
}

#[cfg(not(target_arch = "wasm32"))]
pub fn open_stream(
    _url: &str,
    _options: StreamOptions,
    _listener: StreamListener,
) -> Result<SseHandle, SseError> {
    Err(SseError::Unsupported)
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use gloo_timers::callback::{Interval, Timeout};
    use js_sys::Date;
    use wasm_bindgen::{closure::Closure, JsCast, JsValue};
    use web_sys::{Event, EventSource, MessageEvent};

    use super::{
        heartbeat_expired, Backoff, SseError, StreamEvent, StreamListener, StreamOptions,
        PING_EVENT, ROSTER_EVENT,
    };

    pub struct Stream {
        url: String,
        options: StreamOptions,
        listener: StreamListener,
        source: RefCell<Option<EventSource>>,
        backoff: RefCell<Backoff>,
        reconnect: RefCell<Option<Timeout>>,
        heartbeat: RefCell<Option<Interval>>,
        last_event_ms: Cell<f64>,
        closed: Cell<bool>,
    }

    impl Stream {
        pub fn new(
            url: &str,
            options: StreamOptions,
            listener: StreamListener,
        ) -> Result<Rc<Self>, SseError> {
            if url.trim().is_empty() {
                return Err(SseError::EventSourceInit("empty stream URL".into()));
            }
            Ok(Rc::new(Self {
                url: url.to_string(),
                backoff: RefCell::new(Backoff::new(&options)),
                options,
                listener,
                source: RefCell::new(None),
                reconnect: RefCell::new(None),
                heartbeat: RefCell::new(None),
                last_event_ms: Cell::new(Date::now()),
                closed: Cell::new(false),
            }))
        }

        pub fn connect(self: &Rc<Self>) {
            if self.closed.get() {
                return;
            }
            match EventSource::new(&self.url) {
                Ok(source) => {
                    self.attach(&source);
                    self.source.replace(Some(source));
                }
                Err(err) => {
                    (self.listener)(StreamEvent::Dropped(format!(
                        "roster stream connect failed: {}",
                        describe(&err)
                    )));
                    self.schedule_reconnect();
                }
            }
        }

        pub fn close(&self) {
            self.closed.set(true);
            if let Some(source) = self.source.borrow_mut().take() {
                source.close();
            }
            if let Some(timer) = self.reconnect.borrow_mut().take() {
                timer.cancel();
            }
            if let Some(interval) = self.heartbeat.borrow_mut().take() {
                interval.cancel();
            }
        }

        fn attach(self: &Rc<Self>, source: &EventSource) {
            self.last_event_ms.set(Date::now());

            let stream = Rc::clone(self);
            let on_open = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                stream.backoff.borrow_mut().reset();
                stream.last_event_ms.set(Date::now());
                stream.start_heartbeat();
                (stream.listener)(StreamEvent::Opened);
            });
            source.set_onopen(Some(on_open.as_ref().unchecked_ref()));
            on_open.forget();

            let stream = Rc::clone(self);
            let on_error = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                (stream.listener)(StreamEvent::Dropped("roster stream interrupted".into()));
                stream.restart();
            });
            source.set_onerror(Some(on_error.as_ref().unchecked_ref()));
            on_error.forget();

            let stream = Rc::clone(self);
            let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |evt: MessageEvent| {
                stream.deliver(None, &evt);
            });
            source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
            on_message.forget();

            for name in [ROSTER_EVENT, PING_EVENT] {
                let stream = Rc::clone(self);
                let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |evt: MessageEvent| {
                    stream.deliver(Some(name), &evt);
                });
                if let Err(err) =
                    source.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
                {
                    tracing::warn!(event = name, err = %describe(&err), "event listener not attached");
                }
                listener.forget();
            }
        }

        fn deliver(&self, event: Option<&str>, evt: &MessageEvent) {
            if self.closed.get() {
                return;
            }
            self.last_event_ms.set(Date::now());
            let payload = evt.data();
            let data = payload.as_string().unwrap_or_else(|| describe(&payload));
            (self.listener)(StreamEvent::Frame {
                event: event.map(str::to_string),
                data,
            });
        }

        fn restart(self: &Rc<Self>) {
            if let Some(source) = self.source.borrow_mut().take() {
                source.close();
            }
            self.schedule_reconnect();
        }

        fn schedule_reconnect(self: &Rc<Self>) {
            if self.closed.get() {
                return;
            }
            if let Some(timer) = self.reconnect.borrow_mut().take() {
                timer.cancel();
            }
            let delay = self.backoff.borrow_mut().next_delay();
            tracing::debug!(delay_ms = delay.as_millis() as u64, "roster stream reconnect scheduled");

            let stream = Rc::clone(self);
            let timer = Timeout::new(delay.as_millis() as u32, move || stream.connect());
            self.reconnect.replace(Some(timer));
        }

        fn start_heartbeat(self: &Rc<Self>) {
            if let Some(interval) = self.heartbeat.borrow_mut().take() {
                interval.cancel();
            }
            let period = (self.options.heartbeat().as_millis() / 2) as u32;
            let stream = Rc::clone(self);
            let interval = Interval::new(period, move || {
                if stream.closed.get() {
                    return;
                }
                if heartbeat_expired(&stream.options, stream.last_event_ms.get(), Date::now()) {
                    (stream.listener)(StreamEvent::Dropped(
                        "roster stream heartbeat timed out".into(),
                    ));
                    stream.restart();
                }
            });
            self.heartbeat.replace(Some(interval));
        }
    }

    fn describe(value: &JsValue) -> String {
        if let Some(text) = value.as_string() {
            return text;
        }
        js_sys::JSON::stringify(value)
            .ok()
            .and_then(|js| js.as_string())
            .unwrap_or_else(|| "unknown error".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_up_to_the_ceiling_and_resets() {
        let options = StreamOptions {
            retry_base: Duration::from_secs(1),
            retry_max: Duration::from_secs(5),
            ..StreamOptions::default()
        };
        let mut backoff = Backoff::new(&options);
        let delays: Vec<u64> = (0..5).map(|_| backoff.next_delay().as_secs()).collect();
        assert_eq!(delays, vec![1, 2, 4, 5, 5]);

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn backoff_enforces_floors() {
        let options = StreamOptions {
            retry_base: Duration::ZERO,
            retry_max: Duration::ZERO,
            ..StreamOptions::default()
        };
        let mut backoff = Backoff::new(&options);
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
    }

    #[test]
    fn heartbeat_window_has_a_floor() {
        let short = StreamOptions::with_heartbeat(Duration::from_millis(100));
        assert!(!heartbeat_expired(&short, 0.0, 4_000.0));
        assert!(heartbeat_expired(&short, 0.0, 5_001.0));

        let long = StreamOptions::default();
        assert!(!heartbeat_expired(&long, 1_000.0, 31_000.0));
        assert!(heartbeat_expired(&long, 1_000.0, 31_001.0));
    }

    #[test]
    fn pings_are_recognised_by_event_name() {
        let ping = StreamEvent::Frame {
            event: Some(PING_EVENT.into()),
            data: String::new(),
        };
        let roster = StreamEvent::Frame {
            event: Some(ROSTER_EVENT.into()),
            data: "[]".into(),
        };
        assert!(ping.is_ping());
        assert!(!roster.is_ping());
        assert!(!StreamEvent::Opened.is_ping());
    }

    #[test]
    fn native_builds_report_unsupported() {
        let opened = open_stream("http://localhost/stream", StreamOptions::default(), Box::new(|_| {}));
        assert!(matches!(opened, Err(SseError::Unsupported)));
    }
}
