//! Double elimination example: generating a pool, entering results and
//! correcting a mistake
//!
//! This example demonstrates:
//! - Loading a pool definition from JSON
//! - Byes settled at generation time
//! - Losers dropping into the losers bracket
//! - Cascading invalidation when a result changes
//! - Standings and pool statistics

use bracketry::*;

const POOL: &str = r#"{
    "kind": "doubleElimination",
    "participants": [
        { "id": "ann", "name": "Ann", "seed": 1 },
        { "id": "ben", "name": "Ben", "seed": 2 },
        { "id": "cid", "name": "Cid", "seed": 3 },
        { "id": "dee", "name": "Dee", "seed": 4 },
        { "id": "eve", "name": "Eve", "seed": 5 }
    ]
}"#;

fn describe(slot: &Slot, bracket: &Bracket) -> String {
    match slot {
        Slot::Unresolved => String::from("?"),
        Slot::Bye => String::from("(bye)"),
        Slot::Resolved(entrant) => bracket
            .participant(&entrant.lead)
            .map_or_else(|| entrant.to_string(), |p| p.name.clone()),
    }
}

fn print_rounds(bracket: &Bracket, title: &str, rounds: &[Round]) {
    for round in rounds {
        println!("  {title} round {}", round.value);
        for id in &round.matches {
            let Some(m) = bracket.get(*id) else {
                continue;
            };
            let result = match m.outcome() {
                Some(Outcome::Win(side)) => format!("-> {}", describe(m.slot(side), bracket)),
                Some(Outcome::Draw) => String::from("-> draw"),
                None => String::new(),
            };
            println!(
                "    {:>4}  {:>6} vs {:<6} {}{}",
                m.id.to_string(),
                describe(&m.left, bracket),
                describe(&m.right, bracket),
                result,
                if m.is_finals { "  [grand final]" } else { "" }
            );
        }
    }
}

fn print_bracket(bracket: &Bracket) {
    print_rounds(bracket, "Winners", bracket.rounds());
    print_rounds(bracket, "Losers", bracket.losers());
    println!();
}

/// Play the first match with two known sides, favouring the better seed.
fn play_next(bracket: &mut Bracket) -> Result<bool, BracketError> {
    let next = bracket
        .matches()
        .iter()
        .find(|m| !m.is_bye && m.has_both_sides() && !m.is_decided())
        .map(|m| {
            let seed = |side| {
                m.slot(side)
                    .entrant()
                    .and_then(|e| bracket.participant(&e.lead))
                    .map_or(u32::MAX, |p| p.seed)
            };
            let side = if seed(Side::Left) <= seed(Side::Right) {
                Side::Left
            } else {
                Side::Right
            };
            (m.id, side)
        });

    match next {
        Some((id, side)) => bracket.record_result(id, Outcome::Win(side)),
        None => Ok(false),
    }
}

fn main() -> Result<(), BracketError> {
    println!("=== Double Elimination Demo ===\n");

    // ===== Generation =====
    println!("1. Generation\n");

    let pool = PoolDefinition::from_json(POOL)?;
    let mut bracket = pool.generate();
    println!(
        "{} with {} players: {} matches, losers bracket starts at {}",
        bracket.kind(),
        bracket.participants().len(),
        bracket.match_count(),
        bracket
            .first_loser_index()
            .map_or_else(|| String::from("-"), |id| id.to_string())
    );
    print_bracket(&bracket);

    // ===== Results =====
    println!("2. Playing every match, better seed wins\n");

    while play_next(&mut bracket)? {}
    print_bracket(&bracket);
    if let Some(champion) = bracket.champion() {
        println!("  Champion: {}\n", describe(&Slot::Resolved(champion.clone()), &bracket));
    }

    // ===== Correction =====
    println!("3. Correcting match #4: Eve actually beat Dee\n");

    bracket.record_result(MatchId::new(4), Outcome::Win(Side::Right))?;
    println!("  Complete after correction: {}", bracket.is_complete());
    print_bracket(&bracket);

    while play_next(&mut bracket)? {}
    print_bracket(&bracket);

    // ===== Standings =====
    println!("4. Standings\n");

    println!("  {:>4} {:>4}  {:<6} {:>3} {:>3} {:>3}", "Rank", "Seed", "Name", "W", "L", "Bye");
    for record in bracket.standings() {
        println!(
            "  {:>4} {:>4}  {:<6} {:>3} {:>3} {:>3}",
            record.rank, record.prior_rank, record.name, record.wins, record.losses, record.byes
        );
    }

    let stats = bracket.statistics();
    println!(
        "\n  {} of {} matches finished, {} byes",
        stats.finished(),
        stats.matches,
        stats.byes
    );

    // ===== Snapshot =====
    println!("\n5. Snapshot\n");

    let json = bracket.to_json()?;
    let restored = Bracket::from_json(&json)?;
    println!(
        "  Restored {} bytes of JSON, champion still {}",
        json.len(),
        restored
            .champion()
            .map_or_else(|| String::from("undecided"), |e| e.lead.to_string())
    );

    Ok(())
}
