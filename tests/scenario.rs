//! Full session: intro, catch all seven hearts, decline once, accept.

use catch_the_hearts::Settings;
use catch_the_hearts::effects::CELEBRATION;
use catch_the_hearts::sim::{Action, GameEvent, GameState, IntroChoice, Stage, tick};
use catch_the_hearts::{field_center, inner_bounds};
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn run_frames(state: &mut GameState, rng: &mut Pcg32, frames: usize) {
    let (min, max) = inner_bounds();
    for _ in 0..frames {
        let before: Vec<bool> = state.hearts.iter().map(|h| h.collected).collect();
        tick(state, rng);
        for (h, was) in state.hearts.iter().zip(before) {
            assert_eq!(h.collected, was, "ticking never changes collected");
            assert!(h.pos.cmpge(min).all() && h.pos.cmple(max).all());
        }
    }
}

#[test]
fn test_full_session() {
    let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
    let mut state = GameState::new(Settings::default(), &mut rng);
    run_frames(&mut state, &mut rng, 10);

    state.dispatch(Action::Answer(IntroChoice::Yes));
    assert_eq!(state.stage, Stage::IntroResponse);
    state.dispatch(Action::StartGame);
    assert_eq!(state.stage, Stage::Playing);

    let mut helper_token = None;
    for id in 0..6 {
        run_frames(&mut state, &mut rng, 20);
        let events = state.dispatch(Action::ClickHeart(id));
        assert_eq!(state.stage, Stage::Playing);
        assert!(events.contains(&GameEvent::NoteOpened { heart: id }));
        assert_eq!(state.note.as_deref(), Some(state.hearts[id].message.as_str()));

        for e in &events {
            if let GameEvent::ArmHelperTimer { token, delay_ms } = e {
                assert_eq!(*delay_ms, 5000);
                helper_token = Some(*token);
            }
        }

        state.dispatch(Action::CloseNote);
        assert!(state.note.is_none());
    }

    // Last heart runs from the cursor
    assert!(state.evasive_condition());
    assert_eq!(state.runner(), Some(6));
    let token = helper_token.expect("helper timer armed at 6/7");

    state.set_pointer(state.hearts[6].pos);
    run_frames(&mut state, &mut rng, 120);
    assert!(!state.helper_visible());

    state.dispatch(Action::HelperTimerFired(token));
    assert!(state.helper_visible());
    state.dispatch(Action::RequestHelp);
    run_frames(&mut state, &mut rng, 60);
    assert_eq!(state.hearts[6].pos, field_center());

    let events = state.dispatch(Action::ClickHeart(6));
    assert_eq!(state.stage, Stage::Unlocked);
    assert!(state.note.is_none());
    assert!(events.contains(&GameEvent::CancelHelperTimer { token }));
    assert!(state.hearts.iter().all(|h| h.collected));

    assert_eq!(state.dispatch(Action::Decline), vec![GameEvent::ShakePrompt]);
    assert_eq!(state.stage, Stage::Unlocked);

    let events = state.dispatch(Action::Accept);
    assert_eq!(state.stage, Stage::Accepted);
    assert!(events.contains(&GameEvent::Celebrate));
    assert_eq!(CELEBRATION.len(), 2);
    assert_eq!(CELEBRATION[1].delay_ms, 250);
}

#[test]
fn test_chase_ending_early_never_shows_helper() {
    let mut rng = Pcg32::seed_from_u64(11);
    let mut state = GameState::new(Settings::default(), &mut rng);
    state.dispatch(Action::Answer(IntroChoice::No));
    state.dispatch(Action::StartGame);

    let mut token = None;
    for id in 0..6 {
        for e in state.dispatch(Action::ClickHeart(id)) {
            if let GameEvent::ArmHelperTimer { token: t, .. } = e {
                token = Some(t);
            }
        }
        state.dispatch(Action::CloseNote);
    }

    // Caught before the delay elapsed
    state.dispatch(Action::ClickHeart(6));
    let late = state.dispatch(Action::HelperTimerFired(token.unwrap()));
    assert!(late.is_empty());
    assert!(!state.helper_visible());
    assert!(!state.helper.ready);
}
