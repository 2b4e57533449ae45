use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed is not well-formed XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("feed item has no description")]
    MissingDescription,
    #[error("output store error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ScrapeError {
    /// Transient errors are worth another attempt: connection, proxy,
    /// timeout and HTTP-status failures. A request that could not even be
    /// built will fail the same way every time.
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Http(e) => !e.is_builder(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_errors_are_not_transient() {
        assert!(!ScrapeError::MissingDescription.is_transient());
        let io = ScrapeError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(!io.is_transient());
    }
}
