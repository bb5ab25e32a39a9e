pub mod oauth;
pub mod session;

pub use oauth::GoogleOAuth;
pub use session::{
    clear_login_state_cookie, clear_session_cookie, login_state, login_state_cookie, session_cookie,
    session_id, Session, SessionStore,
};
