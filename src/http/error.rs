use std::fmt;

use rouille::Response;

use crate::upload::UploadError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MissingField(_) => {
                ApiError::BadRequest("Please fill all fields and upload a file.".into())
            }
            UploadError::EmptyFile
            | UploadError::UnsupportedFormat(_)
            | UploadError::TooLarge { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<rouille::input::post::PostError> for ApiError {
    fn from(err: rouille::input::post::PostError) -> Self {
        ApiError::BadRequest(format!("invalid form data: {err}"))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Internal(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::Internal(_) => 500,
        }
    }

    pub fn into_response(self) -> Response {
        let status = self.status_code();
        Response::text(self.to_string()).with_status_code(status)
    }
}
