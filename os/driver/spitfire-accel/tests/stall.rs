mod common;

use common::*;
use spitfire_accel::{
    AccelError, Engine, EngineConfig, EngineStalled, FillSetup, Rect, Rop, StallPolicy,
};

fn engine(bus: RecordingBus, stall_policy: StallPolicy) -> Engine<RecordingBus> {
    let config = EngineConfig {
        poll_limit: 4,
        stall_policy,
        ..EngineConfig::default()
    };
    Engine::new(bus, context(32, 640, 480, 2 * MIB), config)
}

const WHITE: FillSetup = FillSetup {
    color: 0x00FF_FFFF,
    rop: Rop::Copy,
    plane_mask: None,
};

#[test]
fn waits_for_busy_bit_to_clear() {
    let mut engine = engine(RecordingBus::busy_for(3), StallPolicy::Abort);
    assert_eq!(engine.wait_idle(), Ok(3));
    assert_eq!(engine.bus().status_reads, 4);
    assert!(!engine.is_busy());
}

#[test]
fn gives_up_after_poll_limit() {
    let mut engine = engine(RecordingBus::stuck(), StallPolicy::Abort);
    assert_eq!(engine.wait_idle(), Err(EngineStalled { polls: 4 }));
    assert_eq!(engine.bus().status_reads, 5);
}

#[test]
fn abort_policy_skips_register_writes() {
    let mut engine = engine(RecordingBus::stuck(), StallPolicy::Abort);
    let screen = engine.context().screen();

    assert_eq!(
        engine.prepare_solid_fill(&screen, &WHITE),
        Err(AccelError::Stalled(EngineStalled { polls: 4 }))
    );
    assert!(engine.bus().writes().is_empty());
    assert_eq!(engine.stats().stalls, 1);
}

#[test]
fn abort_policy_on_execute() {
    let mut engine = engine(RecordingBus::new(), StallPolicy::Abort);
    let screen = engine.context().screen();
    let op = engine.prepare_solid_fill(&screen, &WHITE).unwrap();
    engine.bus_mut().take();

    engine.bus_mut().set_stuck(true);
    assert!(matches!(
        engine.solid_fill(&op, Rect::new(0, 0, 8, 8)),
        Err(AccelError::Stalled(_))
    ));
    assert!(engine.bus().writes().is_empty());

    // The setup survives the stall.
    engine.bus_mut().set_stuck(false);
    engine.solid_fill(&op, Rect::new(0, 0, 8, 8)).unwrap();
    assert_eq!(engine.stats().submitted, 1);
}

#[test]
fn ignore_policy_programs_anyway() {
    let mut engine = engine(RecordingBus::stuck(), StallPolicy::Ignore);
    let screen = engine.context().screen();

    let op = engine.prepare_solid_fill(&screen, &WHITE).unwrap();
    engine.solid_fill(&op, Rect::new(0, 0, 8, 8)).unwrap();

    assert_eq!(engine.stats().stalls, 2);
    assert_eq!(engine.stats().submitted, 1);
    assert!(!engine.bus().writes().is_empty());
}
