use super::{ScriptError, ScriptResult, Scripts, new_scripts};
use crate::def::{THOR, World};
use crate::env::{DialogKind, Sound};
use crate::test_util::{TestEnv, test_env, test_world};

fn table(body: &str) -> String {
    format!("|1\n{body}\n|STOP\n")
}

fn setup(body: &str) -> (World, TestEnv, Scripts) {
    let mut w = test_world();
    w.game.current_area = 1;
    let mut env = test_env();
    env.scripts.insert("SPEAK1".to_string(), table(body));
    (w, env, new_scripts())
}

fn run(body: &str) -> (World, TestEnv, Scripts, ScriptResult) {
    let (mut w, mut env, mut sc) = setup(body);
    let r = sc.execute(1, &mut w, &mut env);
    (w, env, sc, r)
}

#[test]
fn test_arithmetic_is_left_to_right() {
    let (_, _, sc, r) = run("A=2+3*4\nEND");
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(sc.num_var[0], 20);
}

#[test]
fn test_goto_skips_over_statements() {
    let (w, _, _, r) = run("GOTO SKIP\nADDSCORE 99\nSKIP: END");
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(w.game.thor_info.score, 0);
}

#[test]
fn test_gosub_returns_to_call_site() {
    let (w, _, _, r) = run("GOSUB SUB\nADDSCORE 5\nEND\nSUB: ADDSCORE 5\nRETURN");
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(w.game.thor_info.score, 10);
}

#[test]
fn test_for_next_loops_inclusive() {
    let (_, _, sc, r) = run("B=0\nFOR A=1 TO 3\nB=B+1\nNEXT\nEND");
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(sc.num_var[1], 3);
    // the loop variable runs one past the limit
    assert_eq!(sc.num_var[0], 4);
}

#[test]
fn test_failed_if_runs_the_else_entry() {
    let (w, _, _, r) = run(
        "A=1\nIF A=1 THEN ADDSCORE 10\nIF A=2 THEN ADDSCORE 100\nELSE ADDSCORE 1\nEND",
    );
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(w.game.thor_info.score, 11);
}

#[test]
fn test_successful_if_falls_past_else() {
    let (_, _, sc, r) = run("A=1\nIF A=1 THEN A=5\nELSE A=9\nEND");
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(sc.num_var[0], 5);
}

#[test]
fn test_say_pauses_and_resumes() {
    let (mut w, mut env, mut sc) = setup("SAY 3,\"HELLO\"\nADDSCORE 7\nEND");
    assert_eq!(sc.execute(1, &mut w, &mut env), ScriptResult::Paused);
    assert_eq!(
        env.says,
        vec![("HELLO".to_string(), 3, DialogKind::Speech)]
    );
    assert_eq!(w.game.thor_info.score, 0);

    sc.dialog_closed();
    assert_eq!(sc.run_if_resuming(&mut w, &mut env), ScriptResult::Done);
    assert_eq!(w.game.thor_info.score, 7);
}

#[test]
fn test_ask_stores_the_choice() {
    let (mut w, mut env, mut sc) = setup("ASK C,\"PICK\",\"ONE\",\"TWO\"\nADDSCORE C\nEND");
    assert_eq!(sc.execute(1, &mut w, &mut env), ScriptResult::Paused);
    assert_eq!(
        env.asks,
        vec![("PICK".to_string(), vec!["ONE".to_string(), "TWO".to_string()])]
    );

    sc.set_ask_response(2);
    assert_eq!(sc.run_if_resuming(&mut w, &mut env), ScriptResult::Done);
    assert_eq!(sc.num_var[2], 2);
    assert_eq!(w.game.thor_info.score, 2);
}

#[test]
fn test_internal_variables_read_world_state() {
    let (mut w, mut env, mut sc) = setup("A=@JEWELS+@HEALTH\nIF @FLAG5=1 THEN ADDSCORE 3\nEND");
    w.game.thor_info.jewels = 7;
    w.game.set_flag(5, true);
    assert_eq!(sc.execute(1, &mut w, &mut env), ScriptResult::Done);
    assert_eq!(sc.num_var[0], 157);
    assert_eq!(w.game.thor_info.score, 3);
}

#[test]
fn test_lowercase_and_comments_normalize_away() {
    let (w, _, _, r) = run("addscore 5 ' gives points\nEND");
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(w.game.thor_info.score, 5);
}

#[test]
fn test_colon_separates_statements() {
    let (w, _, sc, r) = run("A=2+3:ADDSCORE 42:END");
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(sc.num_var[0], 5);
    assert_eq!(w.game.thor_info.score, 42);
}

#[test]
fn test_side_effect_commands() {
    let (mut w, mut env, mut sc) =
        setup("SOUND 7\nSETFLAG 12\nPLACETILE 4,5,150\nITEMGIVE 3\nEXEC 2\nEND");
    assert_eq!(sc.execute(1, &mut w, &mut env), ScriptResult::Done);
    assert!(env.sounds.contains(&Sound::Door));
    assert!(env.sounds.contains(&Sound::Discovery));
    assert!(w.game.flag(12));
    assert_eq!(w.screen.tile(4, 5), 150);
    assert_ne!(w.game.thor_info.inventory & (1 << 3), 0);
    assert_eq!(w.game.exec_event, Some(2));
}

#[test]
fn test_run_chains_to_another_script() {
    let (w, _, _, r) = run("RUN 55");
    assert_eq!(r, ScriptResult::Done);
    assert_eq!(w.game.script_request, Some(55));
}

#[test]
fn test_ltoa_and_text() {
    let (mut w, mut env, mut sc) = setup("LTOA 42,B$\nA$=\"GOT \"+B$\nTEXT A$\nEND");
    assert_eq!(sc.execute(1, &mut w, &mut env), ScriptResult::Paused);
    assert_eq!(env.says, vec![("GOT 42".to_string(), 0, DialogKind::Sign)]);
    sc.dialog_closed();
    assert_eq!(sc.run_if_resuming(&mut w, &mut env), ScriptResult::Done);
}

#[test]
fn test_addhealth_can_kill_thor() {
    let (mut w, mut env, mut sc) = setup("ADDHEALTH -200\nEND");
    assert_eq!(sc.execute(1, &mut w, &mut env), ScriptResult::Done);
    assert_eq!(w.actor(THOR).health, 0);
    assert!(w.game.thor_dead);
}

#[test]
fn test_error_return_without_gosub() {
    let (_, _, _, r) = run("RETURN");
    assert_eq!(r, ScriptResult::Error(ScriptError::ReturnWithoutGosub));
}

#[test]
fn test_error_undefined_label() {
    let (_, _, _, r) = run("GOTO NOWHERE");
    assert_eq!(r, ScriptResult::Error(ScriptError::UndefinedLabel));
}

#[test]
fn test_error_missing_script_index() {
    let (mut w, mut env, mut sc) = setup("END");
    assert_eq!(
        sc.execute(5, &mut w, &mut env),
        ScriptResult::Error(ScriptError::CantReadScript)
    );
}

#[test]
fn test_error_unknown_command() {
    let (_, _, _, r) = run("FROBNICATE");
    assert_eq!(r, ScriptResult::Error(ScriptError::Syntax));
}

#[test]
fn test_error_running_off_the_end() {
    let (_, _, _, r) = run("A=1");
    assert_eq!(r, ScriptResult::Error(ScriptError::NoEnd));
}
