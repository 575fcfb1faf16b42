//! Snapshot coverage of the serialized command stream.

mod common;

use common::{context, mix_step, water_state};
use stepgen_core::generate_timeline;
use stepgen_model::{ChangeTip, PauseArgs, Step, StepArgs};

#[test]
fn mix_command_stream_snapshot() {
    let ctx = context();
    let initial = water_state(&ctx, "A1", 200.0);
    let step = mix_step("mix-1", &["A1"], 50.0, 1, ChangeTip::Always);
    let timeline = generate_timeline(&ctx, &initial, &[step]);

    insta::assert_json_snapshot!(timeline.frames[0].commands, @r###"
    [
      {
        "command": "pickUpTip",
        "params": {
          "pipette": "p1",
          "labware": "tiprack1",
          "well": "A1"
        }
      },
      {
        "command": "aspirate",
        "params": {
          "pipette": "p1",
          "labware": "plate1",
          "well": "A1",
          "volume": 50.0,
          "offsetFromBottomMm": 1.0,
          "flowRateUlSec": 150.0
        }
      },
      {
        "command": "dispense",
        "params": {
          "pipette": "p1",
          "labware": "plate1",
          "well": "A1",
          "volume": 50.0,
          "offsetFromBottomMm": 0.5,
          "flowRateUlSec": 300.0
        }
      }
    ]
    "###);
}

#[test]
fn pause_command_snapshot() {
    let ctx = context();
    let initial = water_state(&ctx, "A1", 100.0);
    let step = Step {
        id: "pause-1".into(),
        args: StepArgs::Pause(PauseArgs {
            message: Some("spin down the plate".to_string()),
            seconds: Some(30.0),
        }),
    };
    let timeline = generate_timeline(&ctx, &initial, &[step]);

    insta::assert_json_snapshot!(timeline.frames[0].commands, @r###"
    [
      {
        "command": "delay",
        "params": {
          "wait": 30.0,
          "message": "spin down the plate"
        }
      }
    ]
    "###);
}
