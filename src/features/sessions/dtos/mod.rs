mod session_dto;

pub use session_dto::{LoginRequestDto, LogoutResponseDto, SessionResponseDto};
