//! `DieselTokenRepository` against embedded PostgreSQL.

#[allow(dead_code, reason = "shared harness")]
#[path = "support/pg_embed.rs"]
mod pg_embed;

use pg_embed::{PgWorld, pg_world};
use recipe_backend::domain::ports::TokenRepository;
use recipe_backend::domain::{AccountId, AuthToken, TokenDigest};
use recipe_backend::outbound::persistence::DieselTokenRepository;
use rstest::{fixture, rstest};

#[fixture]
fn world() -> Option<PgWorld> {
    pg_world()
}

fn digest() -> TokenDigest {
    AuthToken::generate().digest()
}

#[rstest]
fn stored_digests_resolve_to_their_account(world: Option<PgWorld>) {
    let Some(world) = world else {
        eprintln!("SKIP-TEST-CLUSTER: stored_digests_resolve_to_their_account skipped");
        return;
    };
    let repo = DieselTokenRepository::new(world.pool.clone());
    let account = world.seed_account("test@example.com").id();
    let token = digest();

    world.block_on(repo.replace(account, &token)).expect("store digest");

    assert_eq!(
        world.block_on(repo.resolve(&token)).expect("query succeeds"),
        Some(account)
    );
    assert_eq!(
        world.block_on(repo.resolve(&digest())).expect("query succeeds"),
        None
    );
}

#[rstest]
fn reissuing_upserts_the_single_row(world: Option<PgWorld>) {
    let Some(world) = world else {
        eprintln!("SKIP-TEST-CLUSTER: reissuing_upserts_the_single_row skipped");
        return;
    };
    let repo = DieselTokenRepository::new(world.pool.clone());
    let account = world.seed_account("test@example.com").id();
    let first = digest();
    let second = digest();

    world.block_on(repo.replace(account, &first)).expect("first digest");
    world.block_on(repo.replace(account, &second)).expect("second digest");

    assert_eq!(world.block_on(repo.resolve(&first)).expect("query"), None);
    assert_eq!(
        world.block_on(repo.resolve(&second)).expect("query"),
        Some(account)
    );
    assert_eq!(world.count("SELECT count(*) FROM auth_tokens"), 1);
}

#[rstest]
fn accounts_keep_separate_tokens(world: Option<PgWorld>) {
    let Some(world) = world else {
        eprintln!("SKIP-TEST-CLUSTER: accounts_keep_separate_tokens skipped");
        return;
    };
    let repo = DieselTokenRepository::new(world.pool.clone());
    let alice = world.seed_account("alice@example.com").id();
    let bob = world.seed_account("bob@example.com").id();
    let (alice_token, bob_token) = (digest(), digest());

    world.block_on(repo.replace(alice, &alice_token)).expect("alice");
    world.block_on(repo.replace(bob, &bob_token)).expect("bob");

    assert_eq!(world.block_on(repo.resolve(&alice_token)).expect("query"), Some(alice));
    assert_eq!(world.block_on(repo.resolve(&bob_token)).expect("query"), Some(bob));
}

#[rstest]
fn tokens_go_with_their_account(world: Option<PgWorld>) {
    let Some(world) = world else {
        eprintln!("SKIP-TEST-CLUSTER: tokens_go_with_their_account skipped");
        return;
    };
    let repo = DieselTokenRepository::new(world.pool.clone());
    let account = world.seed_account("test@example.com").id();
    let token = digest();
    world.block_on(repo.replace(account, &token)).expect("store digest");

    world.execute(&format!("DELETE FROM accounts WHERE id = {}", account.get()));

    assert_eq!(world.count("SELECT count(*) FROM auth_tokens"), 0);
    assert_eq!(world.block_on(repo.resolve(&token)).expect("query"), None);
}

#[rstest]
fn digests_for_unknown_accounts_are_rejected(world: Option<PgWorld>) {
    let Some(world) = world else {
        eprintln!("SKIP-TEST-CLUSTER: digests_for_unknown_accounts_are_rejected skipped");
        return;
    };
    let repo = DieselTokenRepository::new(world.pool.clone());

    let result = world.block_on(repo.replace(AccountId::new(404), &digest()));
    assert!(result.is_err(), "foreign key must reject an unknown account");
}
