use std::collections::HashSet;

use crate::models::GameResult;

use super::{ParticipantEntry, ScoreCalculator, ScoringError, Standing};

/// Ranks and scores every participant of one game.
///
/// Survivors come first, ordered by chip count (ties keep submission order).
/// Eliminated players follow in reverse elimination order, so the first player
/// out takes the worst rank. Results are returned winner first.
pub fn rank_participants(
    entries: &[ParticipantEntry],
    calculator: &dyn ScoreCalculator,
) -> Result<Vec<GameResult>, ScoringError> {
    if entries.is_empty() {
        return Err(ScoringError::inconsistency("a game needs at least one participant"));
    }

    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.player_id.as_str()) {
            return Err(ScoringError::inconsistency(format!(
                "player {} appears more than once",
                entry.player_id
            )));
        }
    }

    let field_size = entries.len() as u32;

    let mut survivors: Vec<(&ParticipantEntry, u64)> = entries
        .iter()
        .filter_map(|entry| match entry.standing {
            Standing::Survivor { chip_count } => Some((entry, chip_count)),
            Standing::Eliminated { .. } => None,
        })
        .collect();
    // stable: equal stacks keep their submission order
    survivors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut eliminated: Vec<(&ParticipantEntry, u32)> = entries
        .iter()
        .filter_map(|entry| match entry.standing {
            Standing::Eliminated { order } => Some((entry, order)),
            Standing::Survivor { .. } => None,
        })
        .collect();
    eliminated.sort_by_key(|(_, order)| *order);

    for (index, (entry, order)) in eliminated.iter().enumerate() {
        if *order != index as u32 + 1 {
            return Err(ScoringError::inconsistency(format!(
                "elimination order of {} is {}, expected {}",
                entry.player_id,
                order,
                index + 1
            )));
        }
    }

    let mut results: Vec<GameResult> = Vec::with_capacity(entries.len());

    for (index, (entry, chip_count)) in survivors.iter().enumerate() {
        let rank = index as u32 + 1;
        results.push(GameResult {
            player_id: entry.player_id.clone(),
            name: entry.name.clone(),
            chip_count: *chip_count,
            score: calculator.calculate(rank, field_size),
            rank,
            eliminated: false,
        });
    }

    for (entry, order) in &eliminated {
        let rank = field_size - order + 1;
        results.push(GameResult {
            player_id: entry.player_id.clone(),
            name: entry.name.clone(),
            chip_count: 0,
            score: calculator.calculate(rank, field_size),
            rank,
            eliminated: true,
        });
    }

    results.sort_by_key(|r| r.rank);

    let ranks_match = results.len() == entries.len()
        && results
            .iter()
            .enumerate()
            .all(|(index, r)| r.rank == index as u32 + 1);
    if !ranks_match {
        return Err(ScoringError::inconsistency(format!(
            "ranked {} results for {} participants",
            results.len(),
            entries.len()
        )));
    }

    Ok(results)
}
