//! Balance derivation by full-chain replay.

use lendchain_core::Record;

/// Derive a participant's net balance from the chain contents.
///
/// Every record is replayed: the amount is subtracted when the participant is
/// the record's lender and added when they are its borrower. Minted records
/// have no lender and debit nobody.
///
/// Lender matching is case-SENSITIVE (the ledger tracks the exact identity
/// that money left) while borrower matching is case-INSENSITIVE. Callers
/// relying on mixed-case identities depend on this asymmetry; do not unify
/// the two without migrating existing chains.
///
/// Pure function of the chain snapshot; O(chain length), no caching.
pub fn balance_of(participant: &str, records: &[Record]) -> i64 {
    let mut balance = 0i64;
    for record in records {
        let request = &record.request;
        if request.lender.as_deref() == Some(participant) {
            balance -= request.amount as i64;
        }
        if request.borrower.eq_ignore_ascii_case(participant) {
            balance += request.amount as i64;
        }
    }
    balance
}
