use crate::error::{Result, TryOnError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Upload,
    Canvas,
    Adjustment,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenStatus {
    #[default]
    Idle,
    Pending,
    /// Readable message, shown next to a retry control.
    Error(String),
}

/// Ties a result to the screen generation it was requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    generation: u64,
}

/// What became of a screen operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Applied(T),
    Failed(String),
    /// Not started: a request was already outstanding or there was nothing to act on.
    Ignored,
    /// Finished after the screen was reset; the result was dropped.
    Discarded,
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Outcome::Applied(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Screen {
    status: ScreenStatus,
    generation: u64,
}

impl Screen {
    pub fn status(&self) -> &ScreenStatus {
        &self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == ScreenStatus::Pending
    }

    /// `None` while a request is outstanding; overlapping actions are dropped.
    pub fn begin(&mut self) -> Option<RequestToken> {
        if self.is_pending() {
            return None;
        }
        self.status = ScreenStatus::Pending;
        Some(RequestToken {
            generation: self.generation,
        })
    }

    fn is_current(&self, token: RequestToken) -> bool {
        token.generation == self.generation
    }

    pub fn finish<T>(&mut self, token: RequestToken, result: Result<T>) -> Outcome<T> {
        if !self.is_current(token) {
            return Outcome::Discarded;
        }
        match result {
            Ok(value) => {
                self.status = ScreenStatus::Idle;
                Outcome::Applied(value)
            }
            Err(e) => {
                log::error!("Screen request failed: {}", e);
                let message = user_message(&e);
                self.status = ScreenStatus::Error(message.clone());
                Outcome::Failed(message)
            }
        }
    }

    /// Back to idle; anything still in flight is discarded when it lands.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = ScreenStatus::Idle;
    }

    pub fn dismiss_error(&mut self) {
        if matches!(self.status, ScreenStatus::Error(_)) {
            self.status = ScreenStatus::Idle;
        }
    }
}

pub fn user_message(error: &TryOnError) -> String {
    match error {
        TryOnError::InitializationError(_) | TryOnError::ConfigError(_) => {
            "The image service is not configured. Set the API_KEY environment variable and try again.".to_string()
        }
        TryOnError::BlockedContent { reason, .. } => format!(
            "Your request was blocked by the safety filter ({}). Try a different image or instruction.",
            reason
        ),
        TryOnError::GenerationInterrupted(reason) => format!(
            "Image generation stopped early ({}). Please try again.",
            reason
        ),
        TryOnError::NoImageReturned(_) => error.to_string(),
        TryOnError::MalformedInput(_) => {
            "That image could not be read. Please use a PNG, JPEG, WebP or GIF image.".to_string()
        }
        TryOnError::InvalidArgument(message) => message.clone(),
        TryOnError::IoError(message) => format!("The file could not be opened: {}", message),
        TryOnError::RequestError(_)
        | TryOnError::ApiError { .. }
        | TryOnError::ResponseError(_)
        | TryOnError::SerializationError(_) => format!(
            "Something went wrong while talking to the image service: {}",
            error
        ),
    }
}
