#[derive(Debug, thiserror::Error)]
pub enum Error {
    // remote store errors
    #[error("remote store operation failed for key '{key}', {message}")]
    RemoteStore {
        key: String,
        message: String,

        #[source]
        source: anyhow::Error,
    },

    // client errors
    #[error("failed to initialize key-value client, {message}")]
    ClientInitFailed {
        message: String,

        #[source]
        source: anyhow::Error,
    },

    // config errors
    #[error("failed to load configuration, {message}")]
    ConfigLoadFailed {
        message: String,

        #[source]
        source: anyhow::Error,
    },

    // value errors
    #[error("failed to decode value of variable '{name}', {message}")]
    ValueDecodeFailed {
        name: String,
        message: String,

        #[source]
        source: anyhow::Error,
    },

    // task errors
    #[error("task '{name}' failed")]
    TaskFailed {
        name: String,

        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Builds a `RemoteStore` error that has no underlying error value.
    /// `detail` becomes the source, so it should say something `message`
    /// does not, such as the body the store responded with.
    pub fn remote_store(
        key: impl Into<String>,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::RemoteStore {
            key: key.into(),
            message: message.into(),
            source: anyhow::anyhow!(detail.into()),
        }
    }

    pub fn is_remote_store(&self) -> bool {
        matches!(self, Self::RemoteStore { .. })
    }
}

pub trait ToRemoteStoreErrorResult<T> {
    fn to_remote_store_err(self, key: &str, message: &str) -> crate::types::Result<T>;
}

impl<T, E> ToRemoteStoreErrorResult<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn to_remote_store_err(self, key: &str, message: &str) -> crate::types::Result<T> {
        self.map_err(|e| Error::RemoteStore {
            key: key.to_string(),
            message: message.to_string(),
            source: e.into(),
        })
    }
}
