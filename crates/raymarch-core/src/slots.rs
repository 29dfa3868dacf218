//! Named parameter slots shared with the raymarching shaders.
//!
//! Names must match the GLSL declarations exactly. Slots are resolved once
//! after linking; a slot the linked program does not expose is [`SlotLocation::Absent`]
//! and every write to it is skipped.

use crate::api::{AttribLocation, GlApi, ProgramId, UniformLocation};

/// Parameter slots a pipeline resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Position,
    View,
    CamToWorld,
    Time,
    ScreenWidth,
    ScreenHeight,
    PixelLenX,
    PixelLenY,
}

impl Slot {
    pub const ALL: [Slot; 8] = [
        Slot::Position,
        Slot::View,
        Slot::CamToWorld,
        Slot::Time,
        Slot::ScreenWidth,
        Slot::ScreenHeight,
        Slot::PixelLenX,
        Slot::PixelLenY,
    ];

    /// GLSL identifier of the slot.
    pub fn name(self) -> &'static str {
        match self {
            Slot::Position => "vs_Pos",
            Slot::View => "u_View",
            Slot::CamToWorld => "u_CamToWorld",
            Slot::Time => "u_Time",
            Slot::ScreenWidth => "u_ScreenWidth",
            Slot::ScreenHeight => "u_ScreenHeight",
            Slot::PixelLenX => "u_PixelLenX",
            Slot::PixelLenY => "u_PixelLenY",
        }
    }

    pub fn is_attribute(self) -> bool {
        matches!(self, Slot::Position)
    }
}

/// Outcome of resolving one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLocation<L> {
    Present(L),
    Absent,
}

impl<L: Copy> SlotLocation<L> {
    pub fn get(&self) -> Option<L> {
        match self {
            SlotLocation::Present(loc) => Some(*loc),
            SlotLocation::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, SlotLocation::Present(_))
    }
}

impl<L> From<Option<L>> for SlotLocation<L> {
    fn from(value: Option<L>) -> Self {
        match value {
            Some(loc) => SlotLocation::Present(loc),
            None => SlotLocation::Absent,
        }
    }
}

/// Every slot of a linked program, each present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTable {
    pub position: SlotLocation<AttribLocation>,
    pub view: SlotLocation<UniformLocation>,
    pub cam_to_world: SlotLocation<UniformLocation>,
    pub time: SlotLocation<UniformLocation>,
    pub screen_width: SlotLocation<UniformLocation>,
    pub screen_height: SlotLocation<UniformLocation>,
    pub pixel_len_x: SlotLocation<UniformLocation>,
    pub pixel_len_y: SlotLocation<UniformLocation>,
}

impl SlotTable {
    /// Resolve every slot against a successfully linked program.
    pub fn resolve(api: &impl GlApi, program: ProgramId) -> Self {
        let uniform = |slot: Slot| SlotLocation::from(api.uniform_location(program, slot.name()));
        Self {
            position: api.attrib_location(program, Slot::Position.name()).into(),
            view: uniform(Slot::View),
            cam_to_world: uniform(Slot::CamToWorld),
            time: uniform(Slot::Time),
            screen_width: uniform(Slot::ScreenWidth),
            screen_height: uniform(Slot::ScreenHeight),
            pixel_len_x: uniform(Slot::PixelLenX),
            pixel_len_y: uniform(Slot::PixelLenY),
        }
    }

    /// Location of a uniform slot. `None` for [`Slot::Position`].
    pub fn uniform(&self, slot: Slot) -> Option<SlotLocation<UniformLocation>> {
        match slot {
            Slot::Position => None,
            Slot::View => Some(self.view),
            Slot::CamToWorld => Some(self.cam_to_world),
            Slot::Time => Some(self.time),
            Slot::ScreenWidth => Some(self.screen_width),
            Slot::ScreenHeight => Some(self.screen_height),
            Slot::PixelLenX => Some(self.pixel_len_x),
            Slot::PixelLenY => Some(self.pixel_len_y),
        }
    }

    pub fn is_present(&self, slot: Slot) -> bool {
        match slot {
            Slot::Position => self.position.is_present(),
            _ => self.uniform(slot).is_some_and(|loc| loc.is_present()),
        }
    }

    /// Names of slots the program does not expose.
    pub fn absent(&self) -> Vec<&'static str> {
        Slot::ALL
            .into_iter()
            .filter(|slot| !self.is_present(*slot))
            .map(Slot::name)
            .collect()
    }
}
