//! Candidate registry contract interface.
//!
//! The registry ABI is declared in human-readable form and every call is
//! encoded and decoded through [`BaseContract`].

use ballot_types::{Candidate, Identity};
use ethers_contract::BaseContract;
use ethers_core::abi::{parse_abi, Detokenize, Tokenize};
use ethers_core::types::{Address, Bytes, U256};

use crate::error::LedgerError;

/// The registry's four functions.
pub const REGISTRY_ABI: &[&str] = &[
    "function vote(uint256 candidateIndex)",
    "function getCandidateVotes(uint256 candidateIndex) view returns (string, uint256)",
    "function getCandidateCount() view returns (uint256)",
    "function hasVoted(address) view returns (bool)",
];

pub const VOTE: &str = "vote";
pub const GET_CANDIDATE_VOTES: &str = "getCandidateVotes";
pub const GET_CANDIDATE_COUNT: &str = "getCandidateCount";
pub const HAS_VOTED: &str = "hasVoted";

/// Calldata builder and output decoder for the registry contract.
#[derive(Clone, Debug)]
pub struct RegistryAbi {
    contract: BaseContract,
}

impl RegistryAbi {
    pub fn new() -> Result<Self, LedgerError> {
        let abi = parse_abi(REGISTRY_ABI)
            .map_err(|e| LedgerError::Encode(format!("registry ABI: {e}")))?;
        Ok(Self {
            contract: BaseContract::from(abi),
        })
    }

    pub fn candidate_count_call(&self) -> Result<Bytes, LedgerError> {
        self.encode(GET_CANDIDATE_COUNT, ())
    }

    pub fn candidate_votes_call(&self, index: usize) -> Result<Bytes, LedgerError> {
        self.encode(GET_CANDIDATE_VOTES, U256::from(index as u64))
    }

    pub fn has_voted_call(&self, voter: Address) -> Result<Bytes, LedgerError> {
        self.encode(HAS_VOTED, voter)
    }

    pub fn vote_call(&self, index: usize) -> Result<Bytes, LedgerError> {
        self.encode(VOTE, U256::from(index as u64))
    }

    pub fn decode_candidate_count(&self, output: &Bytes) -> Result<usize, LedgerError> {
        let count: U256 = self.decode(GET_CANDIDATE_COUNT, output)?;
        let count = fit_u64(count, "candidate count")?;
        usize::try_from(count)
            .map_err(|_| LedgerError::Decode(format!("candidate count {count} does not fit usize")))
    }

    /// Decode the `(string, uint256)` return of `getCandidateVotes`.
    pub fn decode_candidate(&self, output: &Bytes) -> Result<Candidate, LedgerError> {
        let (name, votes): (String, U256) = self.decode(GET_CANDIDATE_VOTES, output)?;
        Ok(Candidate {
            name,
            vote_count: fit_u64(votes, "vote count")?,
        })
    }

    pub fn decode_has_voted(&self, output: &Bytes) -> Result<bool, LedgerError> {
        self.decode(HAS_VOTED, output)
    }

    fn encode<T: Tokenize>(&self, function: &str, args: T) -> Result<Bytes, LedgerError> {
        self.contract
            .encode(function, args)
            .map_err(|e| LedgerError::Encode(format!("{function}: {e}")))
    }

    fn decode<D: Detokenize>(&self, function: &str, output: &Bytes) -> Result<D, LedgerError> {
        self.contract
            .decode_output(function, output)
            .map_err(|e| LedgerError::Decode(format!("{function}: {e}")))
    }
}

/// The ledger address an identity votes from.
pub fn identity_address(identity: &Identity) -> Result<Address, LedgerError> {
    identity
        .as_str()
        .parse::<Address>()
        .map_err(|e| LedgerError::InvalidIdentity(format!("{identity}: {e}")))
}

fn fit_u64(value: U256, what: &str) -> Result<u64, LedgerError> {
    if value > U256::from(u64::MAX) {
        return Err(LedgerError::Decode(format!("{what} {value} exceeds u64")));
    }
    Ok(value.as_u64())
}
