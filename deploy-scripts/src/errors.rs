//! Definitions of errors that can occur during deployment of the contracts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur while patching library addresses into bytecode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// A link reference names a library that has no deployed address
    MissingLibrary(String),
    /// A placeholder slot is not exactly one address wide
    InvalidSlotLength {
        /// The library the slot belongs to
        library: String,
        /// The length of the slot, in bytes
        length: usize,
    },
    /// A placeholder slot reaches past the end of the bytecode
    OutOfBounds {
        /// The library the slot belongs to
        library: String,
        /// The byte offset at which the slot starts
        start: usize,
        /// The length of the bytecode, in bytes
        code_len: usize,
    },
    /// Two placeholder slots cover some of the same bytes
    OverlappingSlots {
        /// The start of the earlier slot
        first: usize,
        /// The start of the later slot
        second: usize,
    },
}

impl Display for LinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::MissingLibrary(name) => write!(f, "missing link library name {name}"),
            LinkError::InvalidSlotLength { library, length } => {
                write!(f, "link slot for {library} is {length} bytes, expected 20")
            }
            LinkError::OutOfBounds {
                library,
                start,
                code_len,
            } => write!(
                f,
                "link slot for {library} at byte {start} exceeds bytecode of {code_len} bytes"
            ),
            LinkError::OverlappingSlots { first, second } => {
                write!(f, "link slots at bytes {first} and {second} overlap")
            }
        }
    }
}

impl Error for LinkError {}

/// Errors that can occur during the deployment of the contracts
#[derive(Debug)]
pub enum DeployError {
    /// A required environment variable is not set
    MissingEnvVar(String),
    /// A configuration value is set but invalid
    InvalidConfig(String),
    /// Error reading or parsing a compilation artifact
    ArtifactParsing(String),
    /// A contract's runtime bytecode exceeds the deployable size
    ContractSize(String),
    /// Error linking library addresses into bytecode
    Linking(LinkError),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error constructing calldata for a contract constructor
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error querying chain state
    ContractInteraction(String),
    /// Error writing the deployments file
    WriteDeployments(String),
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::MissingEnvVar(s) => {
                write!(f, "{s} is not set in the environment variable")
            }
            DeployError::InvalidConfig(s) => write!(f, "invalid configuration: {s}"),
            DeployError::ArtifactParsing(s) => write!(f, "error parsing artifact: {s}"),
            DeployError::ContractSize(s) => write!(f, "contract too large: {s}"),
            DeployError::Linking(e) => write!(f, "error linking libraries: {e}"),
            DeployError::ClientInitialization(s) => write!(f, "error initializing client: {s}"),
            DeployError::CalldataConstruction(s) => write!(f, "error constructing calldata: {s}"),
            DeployError::ContractDeployment(s) => write!(f, "error deploying contract: {s}"),
            DeployError::ContractInteraction(s) => {
                write!(f, "error interacting with chain: {s}")
            }
            DeployError::WriteDeployments(s) => write!(f, "error writing deployments: {s}"),
        }
    }
}

impl Error for DeployError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DeployError::Linking(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LinkError> for DeployError {
    fn from(e: LinkError) -> Self {
        DeployError::Linking(e)
    }
}
