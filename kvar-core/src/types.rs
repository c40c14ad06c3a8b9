use std::sync::Arc;

use crate::{client::KeyValueClient, errors::Error};

pub type Value = Vec<u8>;

pub type SharedClient = Arc<dyn KeyValueClient>;

pub type Result<T> = core::result::Result<T, Error>;
