//! Wizard session: durable configuration state, the edit operations the
//! wizard exposes, and versioned JSON persistence.

mod persist;
mod state;

pub use persist::{
    load_session, parse_session, render_session, save_session, Result, SessionError,
    SESSION_NAME, SESSION_VERSION,
};
pub use state::{Session, SessionState};
