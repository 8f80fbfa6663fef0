mod common;

use common::*;
use spitfire_accel::{
    AccelError, CopyDirection, CopySetup, Direction, Engine, EngineConfig, Fallback, FillRop,
    FillSetup, PatternSetup, Point, Rect, Rop, Surface,
};
use spitfire_regs::offsets;

const COPY: u32 = 0xA813_8000;
const SOLID: u32 = 0x0A03_8000;
const PATTERN: u32 = 0x0813_2000;
const PATTERN_TRANSPARENT: u32 = 0x8813_2000;

fn copy_setup(x: Direction, y: Direction) -> CopySetup {
    CopySetup {
        direction: CopyDirection { x, y },
        rop: Rop::Copy,
        plane_mask: None,
        transparency: None,
    }
}

fn fill_setup(color: u32) -> FillSetup {
    FillSetup {
        color,
        rop: Rop::Copy,
        plane_mask: None,
    }
}

#[test]
fn screen_copy_sequence() {
    let mut engine = engine_16bpp();
    let screen = engine.context().screen();

    let op = engine
        .prepare_copy(
            &screen,
            &screen,
            &copy_setup(Direction::Forward, Direction::Forward),
        )
        .unwrap();
    assert_eq!(op.command().into_bits(), COPY);
    engine
        .copy(&op, Point::new(10, 20), Rect::new(100, 200, 30, 40))
        .unwrap();

    let expected = [
        &[
            W32(offsets::DEST_CC_COLOR, 0),
            W32(offsets::DEST_CC_COND, 6),
            W8(offsets::ROP_MIX, 0xCC),
        ][..],
        &slot(SLOT_A, 0, 1023, 2046, FORMAT_16BPP),
        &slot(SLOT_C, 0, 1023, 2046, FORMAT_16BPP),
        &[
            W16(offsets::OP_DIM_1, 29),
            W16(offsets::OP_DIM_2, 39),
            W16(offsets::OFFSET_X_SRC, 10),
            W16(offsets::OFFSET_X_DST, 100),
            W16(offsets::OFFSET_Y_SRC, 20),
            W16(offsets::OFFSET_Y_DST, 200),
            W32(offsets::COMMAND, COPY),
        ],
    ]
    .concat();
    assert_eq!(engine.bus().writes(), expected);
    assert_eq!(engine.stats().submitted, 1);
}

#[test]
fn copy_anchors_follow_the_direction() {
    let cases = [
        (Direction::Forward, Direction::Forward, COPY, [10, 100, 20, 200]),
        (Direction::Backward, Direction::Forward, COPY | 4, [39, 129, 20, 200]),
        (Direction::Forward, Direction::Backward, COPY | 2, [10, 100, 59, 239]),
        (Direction::Backward, Direction::Backward, COPY | 6, [39, 129, 59, 239]),
    ];

    for (x, y, command, [src_x, dst_x, src_y, dst_y]) in cases {
        let mut engine = engine_16bpp();
        let screen = engine.context().screen();
        let op = engine
            .prepare_copy(&screen, &screen, &copy_setup(x, y))
            .unwrap();
        engine.bus_mut().take();

        engine
            .copy(&op, Point::new(10, 20), Rect::new(100, 200, 30, 40))
            .unwrap();
        assert_eq!(
            engine.bus().writes(),
            [
                W16(offsets::OP_DIM_1, 29),
                W16(offsets::OP_DIM_2, 39),
                W16(offsets::OFFSET_X_SRC, src_x),
                W16(offsets::OFFSET_X_DST, dst_x),
                W16(offsets::OFFSET_Y_SRC, src_y),
                W16(offsets::OFFSET_Y_DST, dst_y),
                W32(offsets::COMMAND, command),
            ],
            "{x:?}/{y:?}"
        );
    }
}

#[test]
fn transparent_copy_with_plane_mask() {
    let mut engine = engine_16bpp();
    let screen = engine.context().screen();
    let setup = CopySetup {
        rop: Rop::Xor,
        plane_mask: Some(0x0000_FFFF),
        transparency: Some(0x07E0),
        ..copy_setup(Direction::Forward, Direction::Forward)
    };

    engine.prepare_copy(&screen, &screen, &setup).unwrap();
    assert_eq!(
        &engine.bus().writes()[..4],
        [
            W32(offsets::PIXEL_BITMASK, 0x0000_FFFF),
            W32(offsets::DEST_CC_COLOR, 0x07E0),
            W32(offsets::DEST_CC_COND, 2),
            W8(offsets::ROP_MIX, 0x66),
        ]
    );
}

#[test]
fn copy_between_offscreen_pixmaps() {
    let mut engine = engine_16bpp();
    let src = Surface {
        offset: 0x0020_0000,
        pitch_bytes: 256,
        height: 64,
        bits_per_pixel: 32,
    };
    let dst = Surface {
        offset: 0x0030_0000,
        pitch_bytes: 512,
        height: 32,
        bits_per_pixel: 32,
    };

    engine
        .prepare_copy(&src, &dst, &copy_setup(Direction::Forward, Direction::Forward))
        .unwrap();
    assert_eq!(
        &engine.bus().writes()[3..],
        [
            slot(SLOT_A, 0x0020_0000, 63, 63, FORMAT_32BPP),
            slot(SLOT_C, 0x0030_0000, 127, 31, FORMAT_32BPP),
        ]
        .concat()
    );
}

#[test]
fn solid_fill_sequence() {
    let mut engine = engine_16bpp();
    let screen = engine.context().screen();

    let op = engine
        .prepare_solid_fill(&screen, &fill_setup(0xF800))
        .unwrap();
    engine.solid_fill(&op, Rect::new(5, 6, 7, 8)).unwrap();
    engine.solid_fill(&op, Rect::new(50, 60, 1, 1)).unwrap();

    let expected = [
        &[
            W32(offsets::FG_COLOR, 0xF800),
            W32(offsets::BG_COLOR, 0xF800),
            W32(offsets::DEST_CC_COLOR, 0),
            W32(offsets::DEST_CC_COND, 6),
            W8(offsets::ROP_MIX, 0xCC),
        ][..],
        &slot(SLOT_C, 0, 1023, 2046, FORMAT_16BPP),
        &[
            W16(offsets::OP_DIM_1, 6),
            W16(offsets::OP_DIM_2, 7),
            W16(offsets::OFFSET_X_SRC, 5),
            W16(offsets::OFFSET_X_DST, 5),
            W16(offsets::OFFSET_Y_SRC, 6),
            W16(offsets::OFFSET_Y_DST, 6),
            W32(offsets::COMMAND, SOLID),
            W16(offsets::OP_DIM_1, 0),
            W16(offsets::OP_DIM_2, 0),
            W16(offsets::OFFSET_X_SRC, 50),
            W16(offsets::OFFSET_X_DST, 50),
            W16(offsets::OFFSET_Y_SRC, 60),
            W16(offsets::OFFSET_Y_DST, 60),
            W32(offsets::COMMAND, SOLID),
        ],
    ]
    .concat();
    assert_eq!(engine.bus().writes(), expected);
    assert_eq!(engine.stats().submitted, 2);
}

#[test]
fn fill_rop_table_is_configurable() {
    let config = EngineConfig {
        fill_rop: FillRop::Solid,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(RecordingBus::new(), context(8, 800, 600, 2 * MIB), config);
    let screen = engine.context().screen();
    let setup = FillSetup {
        rop: Rop::AndReverse,
        ..fill_setup(0x42)
    };

    engine.prepare_solid_fill(&screen, &setup).unwrap();
    assert!(
        engine
            .bus()
            .writes()
            .contains(&W8(offsets::ROP_MIX, 0x50))
    );
}

#[test]
fn pattern_fill_sequence() {
    let mut engine = engine_16bpp();
    let setup = PatternSetup {
        origin: Point::new(16, 2),
        foreground: 0x1234,
        background: Some(0x5678),
        rop: Rop::Copy,
    };

    let op = engine.prepare_mono_pattern(&setup).unwrap();
    assert_eq!(op.command().into_bits(), PATTERN);
    engine
        .mono_pattern_fill(&op, Point::new(3, 4), Rect::new(50, 60, 70, 80))
        .unwrap();

    let expected = [
        &[
            W32(offsets::FG_COLOR, 0x1234),
            W32(offsets::BG_COLOR, 0x5678),
            W32(offsets::DEST_CC_COLOR, 0),
            W32(offsets::DEST_CC_COND, 6),
            W8(offsets::ROP_MIX, 0xCC),
        ][..],
        &slot(SLOT_A, 0, 1023, 2046, FORMAT_16BPP),
        &slot(SLOT_C, 0, 1023, 2046, FORMAT_16BPP),
        // (1024 * 2 + 16) * 2 bytes into video memory.
        &slot(SLOT_B, 4128, 7, 7, FORMAT_1BPP),
        &[
            W16(offsets::OP_DIM_1, 69),
            W16(offsets::OP_DIM_2, 79),
            W16(offsets::OFFSET_X_SRC, 50),
            W16(offsets::OFFSET_Y_SRC, 60),
            W16(offsets::OFFSET_X_PAT, 3),
            W16(offsets::OFFSET_Y_PAT, 4),
            W16(offsets::OFFSET_X_DST, 50),
            W16(offsets::OFFSET_Y_DST, 60),
            W32(offsets::COMMAND, PATTERN),
        ],
    ]
    .concat();
    assert_eq!(engine.bus().writes(), expected);
}

#[test]
fn transparent_pattern_takes_background_from_source() {
    let mut engine = engine_16bpp();
    let setup = PatternSetup {
        origin: Point::new(0, 0),
        foreground: 0xFFFF,
        background: None,
        rop: Rop::Copy,
    };

    let op = engine.prepare_mono_pattern(&setup).unwrap();
    assert_eq!(op.command().into_bits(), PATTERN_TRANSPARENT);
    assert_eq!(engine.bus().writes()[1], W32(offsets::BG_COLOR, 0xFFFF_FFFF));
}

#[test]
fn aliased_24bpp_copy_triples_x() {
    let mut engine = engine_24bpp();
    let screen = engine.context().screen();

    let op = engine
        .prepare_copy(
            &screen,
            &screen,
            &copy_setup(Direction::Backward, Direction::Forward),
        )
        .unwrap();
    engine
        .copy(&op, Point::new(10, 20), Rect::new(100, 200, 30, 40))
        .unwrap();

    let expected = [
        &[
            W32(offsets::DEST_CC_COLOR, 0),
            W32(offsets::DEST_CC_COND, 6),
            W8(offsets::ROP_MIX, 0xCC),
        ][..],
        // 3 × 1024 - 1 bytes wide, programmed as 8 bpp.
        &slot(SLOT_A, 0, 3071, 1363, FORMAT_8BPP),
        &slot(SLOT_C, 0, 3071, 1363, FORMAT_8BPP),
        &[
            W16(offsets::OP_DIM_1, 89),
            W16(offsets::OP_DIM_2, 39),
            W16(offsets::OFFSET_X_SRC, 30 + 90 - 1),
            W16(offsets::OFFSET_X_DST, 300 + 90 - 1),
            W16(offsets::OFFSET_Y_SRC, 20),
            W16(offsets::OFFSET_Y_DST, 200),
            W32(offsets::COMMAND, COPY | 4),
        ],
    ]
    .concat();
    assert_eq!(engine.bus().writes(), expected);
}

#[test]
fn aliased_24bpp_fill_triples_x() {
    let mut engine = engine_24bpp();
    let screen = engine.context().screen();

    let op = engine
        .prepare_solid_fill(&screen, &fill_setup(0x0005_0505))
        .unwrap();
    engine.bus_mut().take();
    engine.solid_fill(&op, Rect::new(4, 5, 10, 2)).unwrap();

    assert_eq!(
        engine.bus().writes(),
        [
            W16(offsets::OP_DIM_1, 29),
            W16(offsets::OP_DIM_2, 1),
            W16(offsets::OFFSET_X_SRC, 12),
            W16(offsets::OFFSET_X_DST, 12),
            W16(offsets::OFFSET_Y_SRC, 5),
            W16(offsets::OFFSET_Y_DST, 5),
            W32(offsets::COMMAND, SOLID),
        ]
    );
}

#[test]
fn only_gray_fills_at_24bpp() {
    let mut engine = engine_24bpp();
    let screen = engine.context().screen();

    assert_eq!(
        engine.prepare_solid_fill(&screen, &fill_setup(0x0001_0203)),
        Err(AccelError::NotAccelerated(Fallback::NonGrayFill(0x0001_0203)))
    );
    assert!(engine.bus().writes().is_empty());
    assert_eq!(engine.bus().status_reads, 0);
    assert_eq!(engine.stats().fallbacks, 1);

    engine
        .prepare_solid_fill(&screen, &fill_setup(0x0005_0505))
        .unwrap();
    assert!(!engine.bus().writes().is_empty());
}

#[test]
fn wide_24bpp_pitch_falls_back() {
    // 1366 × 3 = 4098 bytes per line.
    let mut engine = Engine::new(
        RecordingBus::new(),
        context(24, 1366, 768, 8 * MIB),
        EngineConfig::default(),
    );
    let screen = engine.context().screen();

    assert_eq!(
        engine.prepare_copy(
            &screen,
            &screen,
            &copy_setup(Direction::Forward, Direction::Forward)
        ),
        Err(AccelError::NotAccelerated(Fallback::PitchTooWide(4098)))
    );
    assert_eq!(
        engine.prepare_solid_fill(&screen, &fill_setup(0)),
        Err(AccelError::NotAccelerated(Fallback::PitchTooWide(4098)))
    );
    assert!(engine.bus().writes().is_empty());
}

#[test]
fn mixed_24bpp_copies_fall_back() {
    let mut engine = engine_24bpp();
    let screen = engine.context().screen();
    let other = Surface {
        bits_per_pixel: 32,
        ..screen
    };

    assert_eq!(
        engine.prepare_copy(
            &screen,
            &other,
            &copy_setup(Direction::Forward, Direction::Forward)
        ),
        Err(AccelError::NotAccelerated(Fallback::CrossDepthCopy(32)))
    );
    assert!(engine.bus().writes().is_empty());
}

#[test]
fn no_patterns_at_24bpp() {
    let mut engine = engine_24bpp();
    let setup = PatternSetup {
        origin: Point::new(0, 0),
        foreground: 0,
        background: None,
        rop: Rop::Copy,
    };
    assert_eq!(
        engine.prepare_mono_pattern(&setup),
        Err(AccelError::NotAccelerated(Fallback::PatternAt24Bpp))
    );
    assert!(engine.bus().writes().is_empty());
}

#[test]
fn later_setup_supersedes_earlier_token() {
    let mut engine = engine_16bpp();
    let screen = engine.context().screen();

    let copy = engine
        .prepare_copy(
            &screen,
            &screen,
            &copy_setup(Direction::Forward, Direction::Forward),
        )
        .unwrap();
    let fill = engine.prepare_solid_fill(&screen, &fill_setup(1)).unwrap();
    engine.bus_mut().take();

    assert_eq!(
        engine.copy(&copy, Point::new(0, 0), Rect::new(8, 8, 4, 4)),
        Err(AccelError::Superseded)
    );
    assert!(engine.bus().writes().is_empty());

    // A refused setup leaves the current one in place.
    let too_wide = Surface {
        pitch_bytes: 4200,
        bits_per_pixel: 24,
        ..screen
    };
    assert!(engine.prepare_solid_fill(&too_wide, &fill_setup(0)).is_err());
    engine.solid_fill(&fill, Rect::new(8, 8, 4, 4)).unwrap();
    assert_eq!(engine.stats().submitted, 1);
}
