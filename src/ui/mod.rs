pub mod dialogs;
pub mod editor;
pub mod form_field;
pub mod terminal_guard;
pub mod wizard;

pub use editor::{EditorAction, ProfileScreen};
pub use terminal_guard::{install_panic_hook, TerminalGuard, Tui};
pub use wizard::{WizardAction, WizardScreen};
