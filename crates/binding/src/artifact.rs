//! Compiled contract artifacts.
//!
//! Bytecode is not compiled into the bindings. It is read from the JSON
//! artifacts produced by the contracts build, either the Hardhat layout
//! (`"bytecode": "0x..."`) or the Foundry layout (`"bytecode": {"object": "0x..."}`).

use crate::MockContract;
use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde::Deserialize;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Artifact file could not be read
    #[error("Failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Artifact is not valid JSON or misses the abi
    #[error("Invalid artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact has no creation bytecode (interface or abstract contract)
    #[error("Artifact has no bytecode")]
    MissingBytecode,

    /// Bytecode is not hex, usually an unlinked library placeholder
    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),

    /// Artifact ABI lacks entries the binding relies on
    #[error("Artifact ABI for {contract} is missing {}", .missing.join(", "))]
    AbiMismatch {
        contract: &'static str,
        missing: Vec<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

impl RawBytecode {
    fn into_hex(self) -> String {
        match self {
            Self::Hex(hex) => hex,
            Self::Object { object } => object,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    abi: JsonAbi,
    bytecode: Option<RawBytecode>,
    deployed_bytecode: Option<RawBytecode>,
}

/// ABI and bytecode of a compiled contract.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Contract name, only present in Hardhat artifacts
    pub name: Option<String>,
    pub abi: JsonAbi,
    /// Creation bytecode
    pub bytecode: Bytes,
    /// Runtime bytecode
    pub deployed_bytecode: Option<Bytes>,
}

impl Artifact {
    /// Read and parse an artifact file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&contents)
    }

    /// Load the artifact of a catalogue contract from a Foundry `out/` directory.
    pub fn load_mock(root: impl AsRef<Path>, contract: MockContract) -> Result<Self, ArtifactError> {
        Self::load(contract.artifact_path(root))
    }

    /// Parse an artifact from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let raw: RawArtifact = serde_json::from_str(json)?;

        let bytecode = raw
            .bytecode
            .map(RawBytecode::into_hex)
            .ok_or(ArtifactError::MissingBytecode)
            .and_then(|hex| parse_bytecode(&hex))?;
        if bytecode.is_empty() {
            return Err(ArtifactError::MissingBytecode);
        }

        let deployed_bytecode = raw
            .deployed_bytecode
            .map(|code| parse_bytecode(&code.into_hex()))
            .transpose()?
            .filter(|code| !code.is_empty());

        Ok(Self {
            name: raw.contract_name,
            abi: raw.abi,
            bytecode,
            deployed_bytecode,
        })
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }

    /// Check that every function and event of the binding is in this artifact's ABI.
    pub fn verify_against(&self, contract: MockContract) -> Result<(), ArtifactError> {
        let expected = contract.abi();

        let functions: BTreeSet<_> = self.abi.functions().map(|f| f.selector()).collect();
        let events: BTreeSet<_> = self.abi.events().map(|e| e.selector()).collect();

        let mut missing: Vec<String> = expected
            .functions()
            .filter(|f| !functions.contains(&f.selector()))
            .map(|f| f.signature())
            .collect();
        missing.extend(
            expected
                .events()
                .filter(|e| !events.contains(&e.selector()))
                .map(|e| e.signature()),
        );

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ArtifactError::AbiMismatch {
                contract: contract.name(),
                missing,
            })
        }
    }
}

fn parse_bytecode(hex: &str) -> Result<Bytes, ArtifactError> {
    Bytes::from_str(hex.trim()).map_err(|e| ArtifactError::InvalidBytecode(e.to_string()))
}
