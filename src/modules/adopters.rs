//! Historical adopter scan
//!
//! Replays `SafeHarborAdoption(address indexed entity, address oldDetails,
//! address newDetails)` logs from a registry and keeps the latest agreement
//! per entity.

use std::collections::BTreeMap;

use alloy::primitives::{Address, B256};
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::abi::schema::{adoption_event_data, SAFE_HARBOR_ADOPTION_SIGNATURE};
use crate::domain::abi::{event_topic, AbiType, AbiValue};
use crate::error::{CodecError, QueryError};
use crate::infrastructure::abi::decode;
use crate::infrastructure::{EthereumProvider, RawLog};

/// Latest adoption recorded for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adopter {
    pub entity: Address,
    pub agreement_address: Address,
    pub previous_agreement: Address,
    pub block_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<B256>,
    #[serde(skip)]
    log_index: u64,
}

/// Fetch adoption logs from `registry` and reduce them to one entry per entity
pub async fn scan_adopters(
    provider: &dyn EthereumProvider,
    registry: Address,
    from_block: u64,
) -> Result<Vec<Adopter>, QueryError> {
    let topic0 = event_topic(SAFE_HARBOR_ADOPTION_SIGNATURE);
    info!(%registry, from_block, "querying SafeHarborAdoption events");

    let logs = provider
        .get_logs(registry, topic0, from_block)
        .await
        .map_err(|source| QueryError::RegistryCallFailed { registry, source })?;
    info!(count = logs.len(), "found SafeHarborAdoption events");

    Ok(collect_adopters(&logs))
}

/// Keep the latest adoption per entity, ordered by block then log index.
/// Logs that cannot be decoded are skipped.
pub fn collect_adopters(logs: &[RawLog]) -> Vec<Adopter> {
    let mut latest: BTreeMap<Address, Adopter> = BTreeMap::new();

    for log in logs {
        let adopter = match parse_adoption(log) {
            Ok(adopter) => adopter,
            Err(reason) => {
                warn!(tx = ?log.transaction_hash, %reason, "skipping malformed adoption log");
                continue;
            }
        };

        let newer = latest
            .get(&adopter.entity)
            .map_or(true, |seen| adopter.position() >= seen.position());
        if newer {
            latest.insert(adopter.entity, adopter);
        }
    }

    let mut adopters: Vec<Adopter> = latest.into_values().collect();
    adopters.sort_by_key(Adopter::position);
    adopters
}

impl Adopter {
    fn position(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }
}

fn parse_adoption(log: &RawLog) -> Result<Adopter, String> {
    let topic = log.topics.get(1).ok_or("missing indexed entity topic")?;
    let entity = decode(&AbiType::Address, topic.as_slice(), 0)
        .map_err(|e| e.to_string())?
        .as_address()
        .ok_or("entity topic is not an address")?;

    let data = decode(&adoption_event_data(), &log.data, 0).map_err(|e: CodecError| e.to_string())?;
    let previous_agreement = data
        .field("oldDetails")
        .and_then(AbiValue::as_address)
        .ok_or("missing oldDetails")?;
    let agreement_address = data
        .field("newDetails")
        .and_then(AbiValue::as_address)
        .ok_or("missing newDetails")?;

    Ok(Adopter {
        entity,
        agreement_address,
        previous_agreement,
        block_number: log.block_number.unwrap_or_default(),
        transaction_hash: log.transaction_hash,
        log_index: log.log_index.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Bytes;

    fn word(address: Address) -> Vec<u8> {
        address.into_word().to_vec()
    }

    fn adoption_log(entity: Address, old: Address, new: Address, block: u64, index: u64) -> RawLog {
        let mut data = word(old);
        data.extend(word(new));
        RawLog {
            topics: vec![event_topic(SAFE_HARBOR_ADOPTION_SIGNATURE), entity.into_word()],
            data: Bytes::from(data),
            block_number: Some(block),
            log_index: Some(index),
            transaction_hash: None,
        }
    }

    #[test]
    fn test_latest_adoption_wins() {
        let entity = Address::repeat_byte(0x11);
        let first = Address::repeat_byte(0xa1);
        let second = Address::repeat_byte(0xa2);

        let logs = vec![
            adoption_log(entity, Address::ZERO, second, 20, 0),
            adoption_log(entity, Address::ZERO, first, 10, 3),
        ];
        let adopters = collect_adopters(&logs);

        assert_eq!(adopters.len(), 1);
        assert_eq!(adopters[0].agreement_address, second);
        assert_eq!(adopters[0].block_number, 20);
    }

    #[test]
    fn test_sorted_by_block() {
        let a = Address::repeat_byte(0x01);
        let b = Address::repeat_byte(0x02);
        let logs = vec![
            adoption_log(a, Address::ZERO, Address::repeat_byte(0xaa), 50, 0),
            adoption_log(b, Address::ZERO, Address::repeat_byte(0xbb), 5, 0),
        ];
        let adopters = collect_adopters(&logs);
        let entities: Vec<Address> = adopters.iter().map(|x| x.entity).collect();
        assert_eq!(entities, vec![b, a]);
    }

    #[test]
    fn test_malformed_logs_skipped() {
        let good = adoption_log(
            Address::repeat_byte(0x01),
            Address::ZERO,
            Address::repeat_byte(0xaa),
            1,
            0,
        );
        let mut no_topic = good.clone();
        no_topic.topics.truncate(1);
        let mut short_data = good.clone();
        short_data.data = Bytes::from(vec![0u8; 40]);

        let adopters = collect_adopters(&[no_topic, short_data, good]);
        assert_eq!(adopters.len(), 1);
    }
}
