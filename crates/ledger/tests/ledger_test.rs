use lendchain_ledger::{EngineConfig, EngineError, LendingEngine, PoolStatus};

fn engine() -> LendingEngine {
    LendingEngine::new(EngineConfig {
        mint_cap: 100,
        mint_owner: "Femi".to_string(),
        difficulty: 2,
    })
}

#[test]
fn test_single_loan_lifecycle() {
    let mut engine = engine();

    // genesis: one record crediting the mint owner with the full cap
    assert_eq!(engine.records().len(), 1);
    assert_eq!(engine.balance_of("Femi"), 100);
    assert_eq!(engine.balance_of("John"), 0);
    assert!(engine.is_valid());

    engine.submit_request("Femi", "John", 50).unwrap();
    assert_eq!(engine.pending().len(), 1);

    engine.commit();

    // the request plus the cycle's mint record
    assert_eq!(engine.records().len(), 3);
    assert!(engine.pending().is_empty());
    assert_eq!(engine.balance_of("John"), 50);
    // 100 - 50 lent + 100 replenished
    assert_eq!(engine.balance_of("Femi"), 150);
    assert!(engine.is_valid());
}

#[test]
fn test_commit_growth_matches_pending_count() {
    let mut engine = engine();
    engine.submit_request("Femi", "John", 30).unwrap();
    engine.submit_request("Femi", "Mary", 30).unwrap();
    engine.submit_request("Femi", "Ada", 30).unwrap();

    let pending = engine.pending().len();
    let before = engine.records().len();
    let owner_before = engine.balance_of("Femi");

    engine.commit();

    assert_eq!(engine.records().len(), before + pending + 1);
    assert_eq!(engine.balance_of("Femi"), owner_before - 90 + 100);
}

#[test]
fn test_chain_stays_valid_across_commits() {
    let mut engine = engine();
    for round in 0u64..3 {
        engine
            .submit_request("Femi", "John", 10 + round)
            .unwrap();
        engine.commit();
        assert!(engine.is_valid());
    }
    // every non-genesis record links to its predecessor's seal
    let records = engine.records();
    for pair in records.windows(2) {
        assert_eq!(pair[1].previous_seal, Some(pair[0].seal));
    }
    // idempotent without mutation
    assert_eq!(engine.is_valid(), engine.is_valid());
}

#[test]
fn test_group_pool_funding_issues_shared_credentials() {
    let mut engine = engine();

    // fund two lenders out of the genesis credit
    engine.submit_request("Femi", "Ada", 50).unwrap();
    engine.submit_request("Femi", "Mary", 50).unwrap();
    engine.commit();
    assert_eq!(engine.balance_of("Ada"), 50);
    assert_eq!(engine.balance_of("Mary"), 50);

    engine.create_pool("harvest", 100, 0.5).unwrap();
    engine.add_lender_to_pool("Ada", "harvest").unwrap();
    assert_eq!(engine.pools()[0].status(), PoolStatus::Open);

    engine.add_lender_to_pool("Mary", "harvest").unwrap();

    let pool = &engine.pools()[0];
    assert_eq!(pool.status(), PoolStatus::Funded);
    assert_eq!(pool.total_pledged(), 100);

    let credentials: Vec<_> = pool
        .pledges()
        .iter()
        .map(|pledge| pledge.credential.as_deref())
        .collect();
    assert_eq!(credentials.len(), 2);
    assert!(credentials[0].is_some());
    assert_eq!(credentials[0], credentials[1]);

    // funded pools are closed, even to otherwise-eligible lenders
    assert!(matches!(
        engine.add_lender_to_pool("Femi", "harvest").unwrap_err(),
        EngineError::Pool(_)
    ));

    // the pledges are ordinary transfers: committing them pays the pool
    engine.commit();
    assert_eq!(engine.balance_of("harvest"), 100);
    assert_eq!(engine.balance_of("Ada"), 0);
    assert_eq!(engine.balance_of("Mary"), 0);
    assert!(engine.is_valid());
}

#[test]
fn test_pool_lookup_is_case_insensitive() {
    let mut engine = engine();
    engine.create_pool("Harvest", 100, 0.25).unwrap();
    engine.add_lender_to_pool("Femi", "hArVeSt").unwrap();
    assert_eq!(engine.pools()[0].total_pledged(), 25);
}

#[test]
fn test_seals_meet_configured_difficulty() {
    let mut engine = engine();
    engine.submit_request("Femi", "John", 10).unwrap();
    engine.commit();

    for record in engine.records() {
        assert!(record.seal.has_leading_zero_digits(2));
        assert!(record.verify_seal());
    }
}
