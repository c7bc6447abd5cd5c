//! Shared agreement fixtures
#![allow(dead_code)]

use safe_harbor::domain::abi::schema::GET_DETAILS;
use safe_harbor::domain::abi::AbiValue;
use safe_harbor::infrastructure::abi::encode_params;

pub fn contact(name: &str, info: &str) -> AbiValue {
    AbiValue::tuple([("name", AbiValue::string(name)), ("contact", AbiValue::string(info))])
}

pub fn account(address: &str, scope: u64) -> AbiValue {
    AbiValue::tuple([
        ("accountAddress", AbiValue::string(address)),
        ("childContractScope", AbiValue::uint(scope)),
    ])
}

pub fn chain(recovery: &str, accounts: Vec<AbiValue>, caip2: &str) -> AbiValue {
    AbiValue::tuple([
        ("assetRecoveryAddress", AbiValue::string(recovery)),
        ("accounts", AbiValue::Array(accounts)),
        ("caip2ChainId", AbiValue::string(caip2)),
    ])
}

pub fn bounty_terms(
    percentage: u64,
    cap: u64,
    retainable: bool,
    identity: u64,
    diligence: &str,
    aggregate: u64,
) -> AbiValue {
    AbiValue::tuple([
        ("bountyPercentage", AbiValue::uint(percentage)),
        ("bountyCapUSD", AbiValue::uint(cap)),
        ("retainable", AbiValue::Bool(retainable)),
        ("identity", AbiValue::uint(identity)),
        ("diligenceRequirements", AbiValue::string(diligence)),
        ("aggregateBountyCapUSD", AbiValue::uint(aggregate)),
    ])
}

pub fn details(
    name: &str,
    contacts: Vec<AbiValue>,
    chains: Vec<AbiValue>,
    terms: AbiValue,
    uri: &str,
) -> AbiValue {
    AbiValue::tuple([
        ("protocolName", AbiValue::string(name)),
        ("contactDetails", AbiValue::Array(contacts)),
        ("chains", AbiValue::Array(chains)),
        ("bountyTerms", terms),
        ("agreementURI", AbiValue::string(uri)),
    ])
}

/// `Acme Protocol` with no contacts and no chains
pub fn acme() -> AbiValue {
    details(
        "Acme Protocol",
        vec![],
        vec![],
        bounty_terms(500, 1_000_000, true, 1, "KYC required", 0),
        "ipfs://QmAcmeAgreement",
    )
}

/// A fully populated agreement with nested arrays and multi-byte strings
pub fn populated() -> AbiValue {
    details(
        "Ñandú Finance ✓",
        vec![
            contact("Security Council", "security@nandu.fi"),
            contact("", "telegram: @nandu_sec"),
        ],
        vec![
            chain(
                "0x1111111111111111111111111111111111111111",
                vec![
                    account("0x2222222222222222222222222222222222222222", 0),
                    account("0x3333333333333333333333333333333333333333", 2),
                ],
                "eip155:1",
            ),
            chain("0x4444444444444444444444444444444444444444", vec![], "eip155:8453"),
            chain(
                "0x5555555555555555555555555555555555555555",
                vec![account("0x6666666666666666666666666666666666666666", 3)],
                "eip155:42161",
            ),
        ],
        bounty_terms(10, 5_000_000, false, 2, "OFAC sanctions screening of the whitehat", 20_000_000),
        "ipfs://bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi",
    )
}

/// `getDetails()` return data for a details value
pub fn encode_details(value: &AbiValue) -> Vec<u8> {
    encode_params(&GET_DETAILS.output_types(), std::slice::from_ref(value)).unwrap()
}
