use std::sync::Arc;

use color_eyre::eyre::Result;

use tide_chain::asset::Asset;

use crate::tests::*;

use super::*;

#[test]
fn pending_changes_shadow_the_snapshot() -> Result<()> {
    let _init_guard = tide_test::init();

    let alice = address_of(&alice());
    let base = MemoryState::new()
        .with_script(alice, accept_all())
        .with_sponsorship(sponsored_asset(), sponsorship(10));

    let mut pending = PendingState::new(&base);
    assert!(pending.script_of(&alice)?.is_some());
    assert_eq!(pending.sponsorship_of(&sponsored_asset())?, Some(sponsorship(10)));

    let tx = transfer(crate::tests::alice(), 100_000, Asset::Native, 0);
    pending.apply(tx.hash(), StateChange::None);
    pending.apply(
        transfer(crate::tests::alice(), 100_000, Asset::Native, 1).hash(),
        StateChange::SetScript {
            account: alice,
            script: None,
        },
    );
    pending.apply(
        transfer(crate::tests::alice(), 100_000, Asset::Native, 2).hash(),
        StateChange::SetSponsorship {
            asset: sponsored_asset(),
            sponsorship: Some(sponsorship(20)),
        },
    );

    assert!(pending.contains_transaction(&tx.hash())?);
    assert_eq!(pending.script_of(&alice)?, None);
    assert_eq!(pending.sponsorship_of(&sponsored_asset())?, Some(sponsorship(20)));

    // The snapshot is unchanged.
    assert!(!base.contains_transaction(&tx.hash())?);
    assert!(base.script_of(&alice)?.is_some());
    assert_eq!(base.sponsorship_of(&sponsored_asset())?, Some(sponsorship(10)));

    Ok(())
}

#[test]
fn later_changes_replace_earlier_ones() {
    let _init_guard = tide_test::init();

    let mut diff = BlockDiff::default();
    let script = Arc::new(accept_all());

    diff.push(
        transfer(alice(), 100_000, Asset::Native, 0).hash(),
        StateChange::SetScript {
            account: address_of(&alice()),
            script: Some(script),
        },
    );
    diff.push(
        transfer(alice(), 100_000, Asset::Native, 1).hash(),
        StateChange::SetScript {
            account: address_of(&alice()),
            script: None,
        },
    );

    assert_eq!(diff.transactions.len(), 2);
    assert_eq!(diff.scripts.len(), 1);
    assert_eq!(diff.scripts.get(&address_of(&alice())), Some(&None));
}

#[test]
fn commit_applies_a_diff() -> Result<()> {
    let _init_guard = tide_test::init();

    let mut state = MemoryState::new()
        .with_script(address_of(&bob()), accept_all())
        .with_sponsorship(sponsored_asset(), sponsorship(10));

    let tx = transfer(alice(), 100_000, Asset::Native, 0);
    let mut diff = BlockDiff::default();
    diff.push(
        tx.hash(),
        StateChange::SetScript {
            account: address_of(&bob()),
            script: None,
        },
    );
    diff.push(
        transfer(alice(), 100_000, Asset::Native, 1).hash(),
        StateChange::SetSponsorship {
            asset: sponsored_asset(),
            sponsorship: None,
        },
    );

    state.commit(diff);

    assert_eq!(state.transaction_count(), 2);
    assert!(state.contains_transaction(&tx.hash())?);
    assert_eq!(state.script_of(&address_of(&bob()))?, None);
    assert_eq!(state.sponsorship_of(&sponsored_asset())?, None);

    Ok(())
}
