pub mod session_handler;

pub use session_handler::{
    __path_get_me, __path_login, __path_logout, get_me, login, logout, SessionState,
};
