//! Reading Hardhat compilation artifacts from disk

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::MAX_RUNTIME_CODE_SIZE,
    errors::{DeployError, LinkError},
    types::V3Contract,
};

/// Placeholder locations in a contract's bytecode, keyed by the source file
/// and then the name of the library whose address belongs in the slot
pub type LinkReferences = BTreeMap<String, BTreeMap<String, Vec<LinkSlot>>>;

/// A placeholder slot in bytecode, in bytes
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct LinkSlot {
    /// The offset of the first byte of the slot
    pub start: usize,
    /// The number of bytes in the slot
    pub length: usize,
}

impl LinkSlot {
    /// The offset one past the last byte of the slot, or `None` if it
    /// overflows
    pub fn end(&self) -> Option<usize> {
        self.start.checked_add(self.length)
    }

    /// The slot as a range of hex characters, or `None` if it overflows
    fn hex_range(&self) -> Option<(usize, usize)> {
        Some((self.start.checked_mul(2)?, self.end()?.checked_mul(2)?))
    }
}

/// The subset of a Hardhat artifact needed to deploy a contract
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// The name of the contract, checked against the contract it is loaded for
    #[serde(default)]
    pub contract_name: Option<String>,
    /// The creation bytecode in hex, possibly with link placeholders
    pub bytecode: String,
    /// The runtime bytecode in hex, possibly with link placeholders
    #[serde(default)]
    pub deployed_bytecode: Option<String>,
    /// Where library addresses must be patched into `bytecode`
    #[serde(default)]
    pub link_references: LinkReferences,
}

impl ContractArtifact {
    /// Read and parse an artifact file
    pub fn from_file(path: &Path) -> Result<Self, DeployError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DeployError::ArtifactParsing(format!("failed to read {}: {e}", path.display()))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            DeployError::ArtifactParsing(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Read the artifact of `contract`, rejecting one compiled from another
    /// contract
    pub fn load_for(contract: V3Contract, path: &Path) -> Result<Self, DeployError> {
        let artifact = Self::from_file(path)?;
        if let Some(name) = artifact.contract_name.as_deref() {
            if name != contract.name() {
                return Err(DeployError::ArtifactParsing(format!(
                    "{} holds {name}, expected {contract}",
                    path.display()
                )));
            }
        }

        Ok(artifact)
    }

    /// The creation bytecode as bytes, with placeholder slots still unfilled
    pub fn unlinked_bytecode(&self) -> Result<UnlinkedBytecode, DeployError> {
        UnlinkedBytecode::from_hex(&self.bytecode, self.link_references.clone())
    }

    /// The size of the runtime bytecode in bytes, if the artifact carries it
    pub fn runtime_code_size(&self) -> Option<usize> {
        self.deployed_bytecode
            .as_deref()
            .map(|code| strip_hex_prefix(code).len() / 2)
    }
}

/// Creation bytecode whose library placeholders have not yet been filled in
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnlinkedBytecode {
    /// The bytecode, with every placeholder slot zeroed
    pub code: Vec<u8>,
    /// The placeholder slots to fill before deployment
    pub link_references: LinkReferences,
}

impl UnlinkedBytecode {
    /// Decode artifact hex into bytes.
    ///
    /// Placeholder characters are not valid hex, so each slot named in
    /// `link_references` is zero-filled before decoding.
    pub fn from_hex(bytecode: &str, link_references: LinkReferences) -> Result<Self, DeployError> {
        let hex_str = strip_hex_prefix(bytecode);
        if hex_str.is_empty() {
            return Err(DeployError::ArtifactParsing(
                "bytecode is empty, is the contract abstract?".to_string(),
            ));
        }

        let mut chars = hex_str.as_bytes().to_vec();
        let code_len = chars.len() / 2;
        for (library, slot) in iter_slots(&link_references) {
            let out_of_bounds = || LinkError::OutOfBounds {
                library: library.to_string(),
                start: slot.start,
                code_len,
            };
            let (start, end) = slot.hex_range().ok_or_else(out_of_bounds)?;
            if end > chars.len() {
                return Err(out_of_bounds().into());
            }
            chars[start..end].fill(b'0');
        }

        let code = hex::decode(&chars).map_err(|e| DeployError::ArtifactParsing(e.to_string()))?;
        Ok(Self {
            code,
            link_references,
        })
    }
}

/// Iterate over every `(library, slot)` pair in a set of link references
pub fn iter_slots<'a>(
    link_references: &'a LinkReferences,
) -> impl Iterator<Item = (&'a str, &'a LinkSlot)> + 'a {
    link_references.values().flat_map(|libraries| {
        libraries
            .iter()
            .flat_map(|(library, slots)| slots.iter().map(move |slot| (library.as_str(), slot)))
    })
}

/// Strip an optional `0x` prefix from a hex string
fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// The artifacts of every contract a deployment needs
#[derive(Clone, Debug, Default)]
pub struct V3Artifacts {
    /// The parsed artifacts, keyed by contract
    artifacts: HashMap<V3Contract, ContractArtifact>,
}

impl V3Artifacts {
    /// Load the compiled artifacts from a Hardhat artifacts directory.
    ///
    /// The WETH9 artifact lives outside of the artifacts directory, and is only
    /// loaded when a path is given for it.
    pub fn load(artifacts_dir: &Path, weth9_artifact: Option<&Path>) -> Result<Self, DeployError> {
        let mut artifacts = HashMap::new();
        for contract in V3Contract::COMPILED {
            let path = contract.artifact_path(artifacts_dir);
            debug!("loading {contract} artifact from {}", path.display());
            artifacts.insert(contract, ContractArtifact::load_for(contract, &path)?);
        }

        if let Some(path) = weth9_artifact {
            debug!("loading WETH9 artifact from {}", path.display());
            let artifact = ContractArtifact::load_for(V3Contract::Weth9, path)?;
            artifacts.insert(V3Contract::Weth9, artifact);
        }

        Ok(Self { artifacts })
    }

    /// Build an artifact set from already parsed artifacts
    pub fn from_artifacts(
        artifacts: impl IntoIterator<Item = (V3Contract, ContractArtifact)>,
    ) -> Self {
        Self {
            artifacts: artifacts.into_iter().collect(),
        }
    }

    /// Get the artifact of the given contract
    pub fn get(&self, contract: V3Contract) -> Result<&ContractArtifact, DeployError> {
        self.artifacts
            .get(&contract)
            .ok_or_else(|| DeployError::ArtifactParsing(format!("no artifact loaded for {contract}")))
    }

    /// Ensure no loaded contract exceeds the EIP-170 runtime code size limit
    pub fn check_code_sizes(&self) -> Result<(), DeployError> {
        for (contract, artifact) in &self.artifacts {
            if let Some(size) = artifact.runtime_code_size() {
                if size > MAX_RUNTIME_CODE_SIZE {
                    return Err(DeployError::ContractSize(format!(
                        "{contract} runtime code is {size} bytes, limit is {MAX_RUNTIME_CODE_SIZE}"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    /// Link references with a single 20 byte slot for `NFTDescriptor`
    fn nft_descriptor_refs(start: usize) -> LinkReferences {
        BTreeMap::from([(
            "contracts/libraries/NFTDescriptor.sol".to_string(),
            BTreeMap::from([(
                "NFTDescriptor".to_string(),
                vec![LinkSlot { start, length: 20 }],
            )]),
        )])
    }

    #[test]
    fn test_parse_hardhat_artifact() {
        let json = r#"{
            "_format": "hh-sol-artifact-1",
            "contractName": "NonfungibleTokenPositionDescriptor",
            "abi": [],
            "bytecode": "0x6080__$cea9be979eee3d87fb124d6cbb244bb0b5$__6040",
            "deployedBytecode": "0x6080",
            "linkReferences": {
                "contracts/libraries/NFTDescriptor.sol": {
                    "NFTDescriptor": [{ "length": 20, "start": 2 }]
                }
            },
            "deployedLinkReferences": {}
        }"#;
        let artifact: ContractArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.runtime_code_size(), Some(2));

        let unlinked = artifact.unlinked_bytecode().unwrap();
        assert_eq!(unlinked.code.len(), 24);
        assert_eq!(&unlinked.code[..2], &[0x60, 0x80]);
        assert!(unlinked.code[2..22].iter().all(|b| *b == 0));
        assert_eq!(&unlinked.code[22..], &[0x60, 0x40]);
    }

    #[test]
    fn test_artifact_without_link_references() {
        let json = r#"{ "abi": [], "bytecode": "0x600160025500" }"#;
        let artifact: ContractArtifact = serde_json::from_str(json).unwrap();
        assert!(artifact.link_references.is_empty());
        assert_eq!(artifact.runtime_code_size(), None);
        assert_eq!(
            artifact.unlinked_bytecode().unwrap().code,
            vec![0x60, 0x01, 0x60, 0x02, 0x55, 0x00]
        );
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let res = UnlinkedBytecode::from_hex("0x", LinkReferences::new());
        assert!(matches!(res, Err(DeployError::ArtifactParsing(_))));
    }

    #[test]
    fn test_placeholder_past_end_rejected() {
        let res = UnlinkedBytecode::from_hex("0x6080", nft_descriptor_refs(1));
        assert!(matches!(
            res,
            Err(DeployError::Linking(LinkError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_placeholder_offset_near_usize_max_rejected() {
        let json = format!(
            r#"{{
                "bytecode": "0x6080",
                "linkReferences": {{
                    "f.sol": {{ "NFTDescriptor": [{{ "start": {}, "length": 20 }}] }}
                }}
            }}"#,
            usize::MAX - 5
        );
        let artifact: ContractArtifact = serde_json::from_str(&json).unwrap();

        assert!(matches!(
            artifact.unlinked_bytecode(),
            Err(DeployError::Linking(LinkError::OutOfBounds { start, .. })) if start == usize::MAX - 5
        ));
        assert_eq!(LinkSlot { start: usize::MAX - 5, length: 20 }.end(), None);
    }

    #[test]
    fn test_oversized_runtime_code_rejected() {
        let oversized = ContractArtifact {
            contract_name: None,
            bytecode: "0x00".to_string(),
            deployed_bytecode: Some(format!("0x{}", "00".repeat(MAX_RUNTIME_CODE_SIZE + 1))),
            link_references: LinkReferences::new(),
        };
        let mut at_limit = oversized.clone();
        at_limit.deployed_bytecode = Some("00".repeat(MAX_RUNTIME_CODE_SIZE));

        let ok = V3Artifacts::from_artifacts([(V3Contract::Factory, at_limit)]);
        assert!(ok.check_code_sizes().is_ok());

        let too_big = V3Artifacts::from_artifacts([(V3Contract::Factory, oversized)]);
        assert!(matches!(
            too_big.check_code_sizes(),
            Err(DeployError::ContractSize(_))
        ));
    }

    #[test]
    fn test_artifact_of_other_contract_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("WETH9.json");
        fs::write(
            &path,
            r#"{ "contractName": "SwapRouter", "bytecode": "0x6080" }"#,
        )
        .unwrap();

        assert!(matches!(
            ContractArtifact::load_for(V3Contract::Weth9, &path),
            Err(DeployError::ArtifactParsing(_))
        ));
        assert!(ContractArtifact::load_for(V3Contract::SwapRouter, &path).is_ok());
    }

    #[test]
    fn test_missing_artifact() {
        let artifacts = V3Artifacts::default();
        assert!(artifacts.get(V3Contract::Weth9).is_err());
    }
}
