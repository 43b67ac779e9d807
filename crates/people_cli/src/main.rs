//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `people_core` linkage with a deterministic CRUD round.
//! - Print one line per step so output can be diffed by eye.

use people_core::{
    Address, MemoryStore, PersonCreate, PersonRepository, PersonUpdate, RepoResult,
    StorePersonRepository,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("people_core ping={}", people_core::ping());
    println!("people_core version={}", people_core::core_version());

    match run_smoke_round() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("people_core smoke failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_smoke_round() -> RepoResult<()> {
    let store = MemoryStore::new();
    let repo = StorePersonRepository::new(&store);

    let created = repo.create(&PersonCreate::new(
        "Alice",
        Address::new("1 Main St", "Springfield", "IL", "62701"),
        "1990-04-01",
    ))?;
    print_step("create", &created);

    repo.update(
        &created.person_id,
        &PersonUpdate {
            name: Some("Alice Liddell".to_string()),
            ..PersonUpdate::default()
        },
    )?;
    print_step("get", &repo.get(&created.person_id)?);
    print_step("list", &repo.list()?);

    repo.delete(&created.person_id)?;
    println!("delete id={} remaining={}", created.person_id, store.len());
    Ok(())
}

fn print_step<T: serde::Serialize>(step: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{step} {json}"),
        Err(err) => println!("{step} <unserializable: {err}>"),
    }
}
