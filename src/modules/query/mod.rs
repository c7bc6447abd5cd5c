//! Agreement query flow
//!
//! Registry lookup, best-effort owner lookup, then `getDetails()`. Every
//! query keeps its state on the stack, so independent queries can run
//! concurrently over a provider that allows it.

use alloy::primitives::Address;
use tracing::{debug, info, warn};

use crate::domain::abi::schema::{GET_AGREEMENT, GET_DETAILS, OWNER};
use crate::domain::abi::{FunctionSpec, NO_AGREEMENT_SELECTOR};
use crate::domain::AgreementDetails;
use crate::error::{CallError, ProjectionError, QueryError};
use crate::infrastructure::abi::{address_argument, decode_params, encode_call, parse_address};
use crate::infrastructure::EthereumProvider;

/// What to query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget {
    /// Resolve the protocol's agreement through the registry first
    Registry { registry: Address, protocol: Address },
    /// Query an agreement contract directly
    Direct { agreement: Address },
}

impl QueryTarget {
    pub fn direct(agreement: &str) -> Result<Self, QueryError> {
        Ok(QueryTarget::Direct {
            agreement: parse_address(agreement)?,
        })
    }

    pub fn registry(registry: &str, protocol: &str) -> Result<Self, QueryError> {
        Ok(QueryTarget::Registry {
            registry: parse_address(registry)?,
            protocol: parse_address(protocol)?,
        })
    }
}

/// Result of the informational `owner()` lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerLookup {
    Found(Address),
    Failed(String),
}

impl OwnerLookup {
    pub fn address(&self) -> Option<Address> {
        match self {
            OwnerLookup::Found(owner) => Some(*owner),
            OwnerLookup::Failed(_) => None,
        }
    }
}

/// A located and decoded agreement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgreementReport {
    pub agreement: Address,
    pub owner: OwnerLookup,
    pub details: AgreementDetails,
    /// Size of the raw `getDetails()` return data
    pub raw_len: usize,
}

/// Successful query outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The registry has no agreement for this protocol
    NoAdoption { protocol: Address },
    Adopted(Box<AgreementReport>),
}

/// Whether a revert payload is the registry's `NoAgreement()` error.
/// Only the leading selector is compared; trailing bytes are ignored.
pub fn is_no_agreement(revert: &[u8]) -> bool {
    revert.get(..4) == Some(NO_AGREEMENT_SELECTOR.as_slice())
}

/// Runs agreement queries against one provider
pub struct AgreementQuery<'a> {
    provider: &'a dyn EthereumProvider,
}

impl<'a> AgreementQuery<'a> {
    pub fn new(provider: &'a dyn EthereumProvider) -> Self {
        Self { provider }
    }

    /// Run the full flow for a target
    pub async fn run(&self, target: QueryTarget) -> Result<QueryOutcome, QueryError> {
        let agreement = match target {
            QueryTarget::Direct { agreement } => agreement,
            QueryTarget::Registry { registry, protocol } => {
                match self.resolve(registry, protocol).await? {
                    Some(agreement) => agreement,
                    None => {
                        info!(%protocol, "no Safe Harbor adoption found");
                        return Ok(QueryOutcome::NoAdoption { protocol });
                    }
                }
            }
        };

        let owner = self.owner(agreement).await;
        let (details, raw_len) = self.fetch_details(agreement).await?;

        Ok(QueryOutcome::Adopted(Box::new(AgreementReport {
            agreement,
            owner,
            details,
            raw_len,
        })))
    }

    /// Ask the registry for the protocol's agreement address.
    ///
    /// `Ok(None)` when the registry reverts with `NoAgreement()` or returns
    /// the zero address.
    pub async fn resolve(
        &self,
        registry: Address,
        protocol: Address,
    ) -> Result<Option<Address>, QueryError> {
        info!(%registry, %protocol, "resolving agreement via registry");
        let calldata = encode_call(GET_AGREEMENT.selector(), &[address_argument(protocol.as_slice())?])?;

        let result = match self.provider.call(registry, calldata).await {
            Ok(result) => result,
            Err(CallError::Revert(data)) if is_no_agreement(&data) => {
                debug!("registry reverted with NoAgreement()");
                return Ok(None);
            }
            Err(source) => return Err(QueryError::RegistryCallFailed { registry, source }),
        };

        let agreement = decode_single_address(&GET_AGREEMENT, &result)?;
        if agreement.is_zero() {
            debug!("registry returned the zero address");
            return Ok(None);
        }
        info!(%agreement, "registry resolved agreement");
        Ok(Some(agreement))
    }

    /// Best-effort `owner()` lookup; failures are downgraded to a warning
    pub async fn owner(&self, agreement: Address) -> OwnerLookup {
        let calldata = match encode_call(OWNER.selector(), &[]) {
            Ok(calldata) => calldata,
            Err(err) => return OwnerLookup::Failed(err.to_string()),
        };

        let outcome = match self.provider.call(agreement, calldata).await {
            Ok(result) => decode_single_address(&OWNER, &result).map_err(|e| e.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(owner) => {
                debug!(%owner, "agreement owner");
                OwnerLookup::Found(owner)
            }
            Err(reason) => {
                warn!(%agreement, %reason, "could not get agreement owner");
                OwnerLookup::Failed(reason)
            }
        }
    }

    /// Call `getDetails()` and project the result
    pub async fn fetch_details(
        &self,
        agreement: Address,
    ) -> Result<(AgreementDetails, usize), QueryError> {
        let calldata = encode_call(GET_DETAILS.selector(), &[])?;
        let result = self
            .provider
            .call(agreement, calldata)
            .await
            .map_err(|source| QueryError::DetailsCallFailed { agreement, source })?;
        info!(%agreement, bytes = result.len(), "got agreement details");

        let values = decode_params(&GET_DETAILS.output_types(), &result)?;
        let value = values.first().ok_or(ProjectionError::MissingField("details"))?;
        let details = AgreementDetails::from_abi(value)?;
        Ok((details, result.len()))
    }
}

fn decode_single_address(spec: &FunctionSpec, data: &[u8]) -> Result<Address, QueryError> {
    let values = decode_params(&spec.output_types(), data)?;
    values
        .first()
        .and_then(|value| value.as_address())
        .ok_or(QueryError::Projection(ProjectionError::WrongKind {
            field: spec.outputs.first().map_or("output", |p| p.name),
            expected: "address",
        }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_agreement_classification() {
        assert!(is_no_agreement(&[0x84, 0x3c, 0xbf, 0xa9]));
        assert!(is_no_agreement(&[0x84, 0x3c, 0xbf, 0xa9, 0xde, 0xad, 0xbe, 0xef]));
        assert!(!is_no_agreement(&[0x84, 0x3c, 0xbf]));
        assert!(!is_no_agreement(&[0x08, 0xc3, 0x79, 0xa0]));
        assert!(!is_no_agreement(&[]));
    }

    #[test]
    fn test_target_parsing() {
        let target = QueryTarget::direct("0xef726071a86b2B31caa035eE3e69c567762c7364").unwrap();
        assert!(matches!(target, QueryTarget::Direct { .. }));

        // One hex digit too many
        let err = QueryTarget::registry(
            "0x1eaCD100B0546E433fbf4d773109cAD482c346860",
            "0xef726071a86b2B31caa035eE3e69c567762c7364",
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidArgument(_)));
    }
}
