use thiserror::Error;

/// The JSON parsed fine but does not look like any known perccli output.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("missing key `{key}` in {context}")]
    MissingKey { key: String, context: String },

    #[error("key `{key}` is not {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("no `{key}` entry to pair with")]
    MissingSibling { key: String },

    #[error("unrecognised perccli output layout for {category}")]
    UnknownVariant { category: &'static str },

    #[error("controller {controller} reported failure: {description}")]
    CommandFailed { controller: String, description: String },

    #[error("malformed identifier `{value}`")]
    BadIdentifier { value: String },
}

/// Anything that makes one category query unusable.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("cannot run perccli: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("perccli exited with {code}: {stderr}")]
    ExitStatus { code: String, stderr: String },

    #[error("perccli did not finish within {seconds}s")]
    Timeout { seconds: u64 },

    #[error("perccli output parsing error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
