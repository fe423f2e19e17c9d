use facesim_core::TreatmentKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerCommand {
    Select(TreatmentKind),
    IntensityUp,
    IntensityDown,
    CycleExpression,
    CycleZone,
    ToggleTracking,
    ToggleProcedural,
    Quit,
}

/// Key names as winit reports them: characters for printable keys, the
/// named-key identifier (`ArrowUp`, `Escape`) otherwise.
#[inline]
pub fn command_for_key(key: &str) -> Option<ViewerCommand> {
    match key {
        "0" => Some(ViewerCommand::Select(TreatmentKind::None)),
        "1" => Some(ViewerCommand::Select(TreatmentKind::Filler)),
        "2" => Some(ViewerCommand::Select(TreatmentKind::Laser)),
        "3" => Some(ViewerCommand::Select(TreatmentKind::SkinImprovement)),
        "ArrowUp" => Some(ViewerCommand::IntensityUp),
        "ArrowDown" => Some(ViewerCommand::IntensityDown),
        "e" | "E" => Some(ViewerCommand::CycleExpression),
        "z" | "Z" => Some(ViewerCommand::CycleZone),
        "t" | "T" => Some(ViewerCommand::ToggleTracking),
        "p" | "P" => Some(ViewerCommand::ToggleProcedural),
        "Escape" => Some(ViewerCommand::Quit),
        _ => None,
    }
}

pub const HELP: &str = "keys: 0-3 treatment, up/down intensity, E expression, Z target zone, T tracking, P procedural shaders, Esc quit";
