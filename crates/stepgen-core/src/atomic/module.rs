//! Module atomic operations: temperature module, magnetic module,
//! thermocycler.
//!
//! Every op verifies the referenced module exists and is the right kind for
//! the operation; a mismatch is a `ModuleNotConfigured` error rather than a
//! panic.

use stepgen_catalog::{InvariantContext, ModuleEntity, ModuleKind};
use stepgen_model::{
    Command, EngageMagnetParams, LidPosition, ModuleId, ModuleOnlyParams, StepError,
    TemperatureParams,
};

use crate::reduce::{CreatorResult, StepOutput};
use crate::robot_state::{ModuleState, RobotState, TemperatureStatus};

fn require_module<'a>(
    action: &str,
    ctx: &'a InvariantContext,
    module: &ModuleId,
    kind: ModuleKind,
) -> Result<&'a ModuleEntity, Vec<StepError>> {
    let entity = ctx
        .module(module)
        .ok_or_else(|| vec![StepError::module_does_not_exist(action, module)])?;
    if entity.kind != kind {
        return Err(vec![StepError::module_not_configured(action, module)]);
    }
    Ok(entity)
}

pub(super) fn set_temperature(
    params: &TemperatureParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    require_module(
        "set target temperature",
        ctx,
        &params.module,
        ModuleKind::TemperatureModule,
    )?;
    let mut robot_state = prev.clone();
    robot_state.module_state.insert(
        params.module.clone(),
        ModuleState::TemperatureModule {
            target_celsius: Some(params.celsius),
            status: TemperatureStatus::Pending,
        },
    );
    Ok(StepOutput {
        commands: vec![Command::SetTargetTemperature(params.clone())],
        robot_state,
        warnings: Vec::new(),
    })
}

/// Wait until the module reaches its target. Requires a target to have been
/// set first; awaiting an idle module is a `ModuleNotConfigured` error.
pub(super) fn await_temperature(
    module: &ModuleId,
    celsius: Option<f64>,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "await temperature";
    require_module(action, ctx, module, ModuleKind::TemperatureModule)?;
    let target = match prev.module_state.get(module) {
        Some(ModuleState::TemperatureModule {
            target_celsius: Some(target),
            ..
        }) => *target,
        _ => return Err(vec![StepError::module_not_configured(action, module)]),
    };
    let awaited = celsius.unwrap_or(target);

    let mut robot_state = prev.clone();
    robot_state.module_state.insert(
        module.clone(),
        ModuleState::TemperatureModule {
            target_celsius: Some(target),
            status: TemperatureStatus::Holding,
        },
    );
    Ok(StepOutput {
        commands: vec![Command::AwaitTemperature(TemperatureParams {
            module: module.clone(),
            celsius: awaited,
        })],
        robot_state,
        warnings: Vec::new(),
    })
}

pub(super) fn deactivate_temperature(
    module: &ModuleId,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    require_module("deactivate", ctx, module, ModuleKind::TemperatureModule)?;
    let mut robot_state = prev.clone();
    robot_state.module_state.insert(
        module.clone(),
        ModuleState::TemperatureModule {
            target_celsius: None,
            status: TemperatureStatus::Deactivated,
        },
    );
    Ok(StepOutput {
        commands: vec![Command::DeactivateTemperature(ModuleOnlyParams {
            module: module.clone(),
        })],
        robot_state,
        warnings: Vec::new(),
    })
}

pub(super) fn engage_magnet(
    params: &EngageMagnetParams,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    require_module(
        "engage magnet",
        ctx,
        &params.module,
        ModuleKind::MagneticModule,
    )?;
    let mut robot_state = prev.clone();
    robot_state.module_state.insert(
        params.module.clone(),
        ModuleState::MagneticModule {
            engaged: true,
            engage_height_mm: Some(params.engage_height_mm),
        },
    );
    Ok(StepOutput {
        commands: vec![Command::EngageMagnet(params.clone())],
        robot_state,
        warnings: Vec::new(),
    })
}

pub(super) fn disengage_magnet(
    module: &ModuleId,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    require_module("disengage magnet", ctx, module, ModuleKind::MagneticModule)?;
    let mut robot_state = prev.clone();
    robot_state.module_state.insert(
        module.clone(),
        ModuleState::MagneticModule {
            engaged: false,
            engage_height_mm: None,
        },
    );
    Ok(StepOutput {
        commands: vec![Command::DisengageMagnet(ModuleOnlyParams {
            module: module.clone(),
        })],
        robot_state,
        warnings: Vec::new(),
    })
}

/// Set or clear the thermocycler block target. `None` deactivates the block.
pub(super) fn set_block_temperature(
    module: &ModuleId,
    celsius: Option<f64>,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "set block temperature";
    require_module(action, ctx, module, ModuleKind::Thermocycler)?;
    let (lid, lid_target) = thermocycler_state(prev, module);

    let mut robot_state = prev.clone();
    robot_state.module_state.insert(
        module.clone(),
        ModuleState::Thermocycler {
            lid,
            block_target_celsius: celsius,
            lid_target_celsius: lid_target,
        },
    );
    let command = match celsius {
        Some(celsius) => Command::SetBlockTemperature(TemperatureParams {
            module: module.clone(),
            celsius,
        }),
        None => Command::DeactivateBlock(ModuleOnlyParams {
            module: module.clone(),
        }),
    };
    Ok(StepOutput {
        commands: vec![command],
        robot_state,
        warnings: Vec::new(),
    })
}

/// Position and/or heat the thermocycler lid. Emits the lid movement first,
/// then the lid target command.
pub(super) fn set_lid(
    module: &ModuleId,
    position: Option<LidPosition>,
    celsius: Option<f64>,
    ctx: &InvariantContext,
    prev: &RobotState,
) -> CreatorResult {
    let action = "set lid";
    require_module(action, ctx, module, ModuleKind::Thermocycler)?;
    let (current_lid, current_lid_target) = thermocycler_state(prev, module);
    let block_target = match prev.module_state.get(module) {
        Some(ModuleState::Thermocycler {
            block_target_celsius,
            ..
        }) => *block_target_celsius,
        _ => None,
    };

    let lid = position.unwrap_or(current_lid);
    let lid_target = celsius.or(current_lid_target);
    let mut commands = Vec::new();
    if let Some(position) = position {
        commands.push(match position {
            LidPosition::Open => Command::OpenLid(ModuleOnlyParams {
                module: module.clone(),
            }),
            LidPosition::Closed => Command::CloseLid(ModuleOnlyParams {
                module: module.clone(),
            }),
        });
    }
    if let Some(celsius) = celsius {
        commands.push(Command::SetLidTemperature(TemperatureParams {
            module: module.clone(),
            celsius,
        }));
    }

    let mut robot_state = prev.clone();
    robot_state.module_state.insert(
        module.clone(),
        ModuleState::Thermocycler {
            lid,
            block_target_celsius: block_target,
            lid_target_celsius: lid_target,
        },
    );
    Ok(StepOutput {
        commands,
        robot_state,
        warnings: Vec::new(),
    })
}

fn thermocycler_state(state: &RobotState, module: &ModuleId) -> (LidPosition, Option<f64>) {
    match state.module_state.get(module) {
        Some(ModuleState::Thermocycler {
            lid,
            lid_target_celsius,
            ..
        }) => (*lid, *lid_target_celsius),
        _ => (LidPosition::Open, None),
    }
}
