pub mod detail_overlay;
pub mod login_form;
pub mod register_form;
pub mod roster;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use login_form::{LoginForm, LoginFormProps};
pub use register_form::{RegisterForm, RegisterFormProps};
pub use roster::{Roster, RosterProps};
