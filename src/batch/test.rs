use super::*;
use std::io::Cursor;

fn line(black: usize, white: usize) -> String {
    format!(
        "{}{}{}",
        "X".repeat(black),
        "O".repeat(white),
        "-".repeat(BOARD_SIZE - black - white)
    )
}

fn positions_from(text: &str) -> Vec<Position> {
    load_positions(Cursor::new(text.as_bytes())).unwrap()
}

#[test]
fn test_load_positions() {
    let text = format!(
        "# header\n{} X\n\n{} O; white to move\n{}\n",
        line(20, 15),
        line(10, 10),
        line(0, 3)
    );
    let positions = positions_from(&text);
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[0].side_to_move, Some(Player::Black));
    assert_eq!(positions[0].board.stone_count(Player::Black), 20);
    assert_eq!(positions[1].side_to_move, Some(Player::White));
    assert_eq!(positions[2].side_to_move, None);
    assert_eq!(positions[2].board.stone_count(Player::White), 3);
}

#[test]
fn test_load_positions_reports_line() {
    let text = format!("{}\n# comment\nXXXX\n", line(1, 1));
    let err = load_positions(Cursor::new(text.as_bytes())).unwrap_err();
    assert_eq!(err.to_string(), "invalid board at line 3");
    assert!(err.root_cause().to_string().contains("expected 64 cells"));
}

#[test]
fn test_evaluate_all() {
    let text = format!("{} X\n{} O\n{} X\n{}\n", line(20, 15), line(20, 15), line(10, 10), line(0, 2));
    let positions = positions_from(&text);
    let records = evaluate_all(&TokenCountEvaluator, &positions, Perspective::SideToMove);
    let scores: Vec<f32> = records.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![1.0, -1.0, 0.0, -1.0]);
    let indices: Vec<usize> = records.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert_eq!(records[1].player, Player::White);
    assert_eq!(records[1].player_tokens, 15);
    assert_eq!(records[1].opponent_tokens, 20);
    assert_eq!(records[3].player, Player::Black);

    let fixed = evaluate_all(
        &TokenCountEvaluator,
        &positions,
        Perspective::Fixed(Player::White),
    );
    let scores: Vec<f32> = fixed.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![-1.0, -1.0, 0.0, 1.0]);

    let nulls = evaluate_all(&NullEvaluator, &positions, Perspective::SideToMove);
    assert!(nulls.iter().all(|r| r.score == 0.0));
}

#[test]
fn test_parallel_matches_sequential() {
    let mut rng = SmallRng::seed_from_u64(0xDEADBEAF);
    let positions = random_positions(&mut rng, 500);
    let sequential: Vec<f32> = positions
        .iter()
        .map(|p| token_count_heuristic(p.side_to_move.unwrap_or(Player::Black), &p.board))
        .collect();
    for threads in [0, 1, 4] {
        let records = evaluate_with_threads(
            &TokenCountEvaluator,
            &positions,
            Perspective::SideToMove,
            threads,
        )
        .unwrap();
        let parallel: Vec<f32> = records.iter().map(|r| r.score).collect();
        assert_eq!(parallel, sequential);
    }
}

#[test]
fn test_random_positions_reproducible() {
    let a = random_positions(&mut SmallRng::seed_from_u64(1), 32);
    let b = random_positions(&mut SmallRng::seed_from_u64(1), 32);
    assert_eq!(a, b);
    for position in &a {
        assert!(position.side_to_move.is_some());
        let text = position.to_string();
        let reloaded = positions_from(&text);
        assert_eq!(reloaded, vec![*position]);
    }
}

#[test]
fn test_summarize() {
    let positions = positions_from(&format!("{} X\n{} O\n{} X\n", line(5, 3), line(5, 3), line(2, 2)));
    let records = evaluate_all(&TokenCountEvaluator, &positions, Perspective::SideToMove);
    assert_eq!(
        summarize(&records),
        Summary {
            wins: 1,
            losses: 1,
            ties: 1
        }
    );
    assert_eq!(summarize(&[]), Summary::default());
}

#[test]
fn test_write_table() {
    let positions = positions_from(&format!("{} O\n", line(20, 15)));
    let records = evaluate_all(&TokenCountEvaluator, &positions, Perspective::SideToMove);
    let mut buf = Vec::new();
    write_table(&mut buf, &records).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "|No.|player|tokens|opponent|score|");
    assert_eq!(lines[2], "|  1|O|15|20|-1.0|");
}

#[test]
fn test_write_json() {
    let positions = positions_from(&format!("{} X\n{}\n", line(20, 15), line(1, 1)));
    let records = evaluate_all(&TokenCountEvaluator, &positions, Perspective::SideToMove);
    let mut buf = Vec::new();
    write_json(&mut buf, &records).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let values: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(values.len(), 2);
    assert_eq!(
        values[0],
        serde_json::json!({
            "index": 1,
            "player": "black",
            "player_tokens": 20,
            "opponent_tokens": 15,
            "score": 1.0,
        })
    );
    assert_eq!(values[1]["score"], serde_json::json!(0.0));
}
