pub mod notifications;
pub mod sidebar;
pub mod staff;
pub mod staff_card;
pub mod staff_form;
pub mod staff_new;
