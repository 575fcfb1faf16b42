pub mod command;
pub mod diagnostics;
pub mod ids;
pub mod step;

pub use command::{
    AirGapParams, BlowoutParams, Command, DelayParams, EngageMagnetParams, ModuleOnlyParams,
    MoveLabwareParams, PipettingParams, TemperatureParams, TipHandlingParams, TouchTipParams, Wait,
};
pub use diagnostics::{ErrorKind, StepError, StepWarning, WarningKind};
pub use ids::{DeckSlot, LabwareId, LiquidId, ModuleId, PipetteId, StepId, WellName};
pub use step::{
    AwaitTemperatureArgs, BlowoutLocation, ChangeTip, ConsolidateArgs, DistributeArgs,
    EngageMagnetArgs, LidPosition, MixArgs, ModuleStepArgs, MoveLabwareArgs, PauseArgs,
    SetTemperatureArgs, Step, StepArgs, ThermocyclerBlockArgs, ThermocyclerLidArgs, TransferArgs,
};
