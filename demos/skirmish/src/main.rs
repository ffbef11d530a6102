//! Skirmish Demo
//!
//! Runs one scripted play session against an in-memory store: gathering,
//! selling, a fight with a slime, and a trip to the marketplace.
//!
//! Set `RUST_LOG=info` (or `debug`) to see the engine's log lines.

use ironvale_core::{BattleStatus, EnemyId, Gold, ItemId, ListingKind, PendingWrite, Principal, WriteSet};
use ironvale_db::Store;
use ironvale_engine::views::Encounter;
use ironvale_engine::{Engine, EngineConfig, ListingFilter, NewListing, PageRequest};
use ironvale_script::Catalog;
use tracing_subscriber::EnvFilter;

const STONE: ItemId = ItemId(1);
const MINOR_POTION: ItemId = ItemId(40);
const SLIME: EnemyId = EnemyId(1);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Ironvale Skirmish ===\n");

    let store = Store::in_memory()?;
    let catalog = Catalog::builtin()?;
    catalog.install(&store)?;
    println!(
        "Catalog installed: {} items, {} enemies",
        catalog.items.len(),
        catalog.enemies.len()
    );

    let engine = Engine::new(
        store,
        EngineConfig {
            seed: Some(42),
            ..EngineConfig::default()
        },
    )?;

    let aria = Principal::player(1);
    let keeper = Principal::admin(2);
    engine.create_character(&aria, "Aria")?;
    engine.create_character(&keeper, "Quartermaster")?;

    // Shop stock comes straight from the store
    let mut stock = WriteSet::new();
    stock.push(PendingWrite::GrantItem {
        owner: keeper.account,
        item_id: MINOR_POTION,
        quantity: 5,
    });
    engine.store().commit(&stock)?;

    println!("\n--- Gathering ---");
    for _ in 0..3 {
        let outcome = engine.gather(&aria, "stone")?;
        println!(
            "  {} x{} (+{} EXP, skill level {}), energy {}",
            outcome.item_name, outcome.quantity, outcome.exp_gained, outcome.skill_level, outcome.energy
        );
    }
    let page = engine.gathering_page(&aria, "stone")?;
    println!(
        "  {} level {}: {:.0}% to next level",
        page.skill_name, page.level, page.progress_percent
    );

    let sale = engine.sell_to_system(&aria, STONE, 2)?;
    println!("  Sold {} stone for {} gold (balance {})", sale.quantity, sale.payout, sale.balance);

    println!("\n--- Marketplace ---");
    let listing = engine.create_listing(
        &keeper,
        NewListing {
            item: MINOR_POTION,
            quantity: 1,
            price: Gold::from_cents(150),
            kind: ListingKind::Admin,
        },
    )?;
    println!("  {} listed {} for {}", keeper, listing.item_name, listing.price);

    let browse = engine.list_active_listings(&ListingFilter::default(), PageRequest::default())?;
    println!("  {} active listing(s)", browse.total);

    match engine.buy_item(&aria, listing.id) {
        Ok(purchase) => println!("  Aria bought it, balance now {}", purchase.balance),
        Err(err) => println!("  Purchase failed: {} ({})", err, err.code()),
    }

    println!("\n--- Battle ---");
    let state = engine.battle_state(&aria, SLIME)?;
    println!(
        "  {} ({} HP) vs Aria ({}/{} HP, atk {}, def {})",
        state.enemy.name, state.enemy.hp, state.health, state.max_health, state.stats.atk, state.stats.def
    );
    loop {
        let turn = engine.attack(&aria, SLIME)?;
        for line in &turn.report.log {
            println!("  {}", line);
        }
        if let Some(rewards) = turn.rewards {
            println!("  Rewards: {} EXP, {} gold", rewards.exp, rewards.gold);
        }
        if turn.status() != BattleStatus::Ongoing {
            break;
        }
    }

    println!("\n--- Adventure ---");
    for _ in 0..3 {
        let outcome = engine.adventure(&aria)?;
        let found = match outcome.encounter {
            Encounter::Enemy { name, .. } => format!("a wild {}", name),
            Encounter::Resource { resource } => format!("a {} node", resource),
            Encounter::Gold { amount } => format!("{} gold", amount),
            Encounter::Exp { gained, .. } => format!("{} EXP", gained),
        };
        println!("  Found {} (energy {})", found, outcome.energy);
    }
    let rest = engine.rest(&aria)?;
    println!("  Rested: +{} HP, +{} energy", rest.healed, rest.recovered);

    let sheet = engine.character_sheet(&aria)?;
    println!(
        "\nAria: level {} ({}/{} EXP), {}/{} HP, {}/{} energy, {} gold",
        sheet.level,
        sheet.experience,
        sheet.exp_to_next_level,
        sheet.health,
        sheet.max_health,
        sheet.energy,
        sheet.max_energy,
        sheet.gold
    );

    println!("\n=== Session Complete ===");
    Ok(())
}
