//! Room classification: staircases, modifiers and furnishing plans.
//!
//! Runs after corridors are routed and draws from the same random source, so it
//! must stay the last consumer of the session's draw sequence.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::config::RoomConfig;
use crate::constants::{ROOMS_CENTER_LIFT, ROOMS_STAIR_COLUMN_DIVISOR};
use crate::geometry::{Footprint, FootprintSide};
use crate::random::RandomSource;
use crate::volume::{SizeClass, Volume, VolumeId};

/// Gameplay variation applied to a room
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RoomModifier {
    /// Plain room
    #[default]
    None,
    /// Room with tall grass patches
    Overgrown,
    /// Room with water pools
    Flooded,
    /// Room holding extra loot
    Treasure,
    /// Room with a stronger enemy group
    Guarded,
}

impl RoomModifier {
    pub const ALL: [RoomModifier; 5] = [
        RoomModifier::None,
        RoomModifier::Overgrown,
        RoomModifier::Flooded,
        RoomModifier::Treasure,
        RoomModifier::Guarded,
    ];

    /// Draw any modifier, `None` included
    pub fn random(random: &mut RandomSource) -> Self {
        Self::ALL[random.next_usize(0, Self::ALL.len())]
    }
}

/// Indices of the two staircase volumes. They are equal for a single volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Staircases {
    pub highest: usize,
    pub lowest: usize,
}

impl Staircases {
    pub fn contains(&self, index: usize) -> bool {
        index == self.highest || index == self.lowest
    }
}

/// Pick the highest and lowest volume.
///
/// The highest is the volume with the greatest top, the lowest the one with the
/// smallest bottom among the others. The first volume wins ties. Both indices
/// are equal only for a single volume. Returns `None` for an empty slice.
pub fn select_staircases(volumes: &[Volume]) -> Option<Staircases> {
    let mut highest: Option<(usize, f32)> = None;
    for (i, volume) in volumes.iter().enumerate() {
        let top = volume.highest_point();
        if highest.map_or(true, |(_, best)| top > best) {
            highest = Some((i, top));
        }
    }
    let (highest, _) = highest?;

    let mut lowest: Option<(usize, f32)> = None;
    for (i, volume) in volumes.iter().enumerate() {
        if i == highest {
            continue;
        }
        let bottom = volume.lowest_point();
        if lowest.map_or(true, |(_, best)| bottom < best) {
            lowest = Some((i, bottom));
        }
    }
    let lowest = lowest.map_or(highest, |(i, _)| i);

    Some(Staircases { highest, lowest })
}

/// Size classes after staircase assignment. When both staircases land on the
/// same volume it ends up `StaircaseUp`.
pub fn staircase_classes(volumes: &[Volume], stairs: Staircases) -> Vec<SizeClass> {
    let mut classes: Vec<SizeClass> = volumes.iter().map(|v| v.class).collect();
    classes[stairs.lowest] = SizeClass::StaircaseDown;
    classes[stairs.highest] = SizeClass::StaircaseUp;
    classes
}

/// How many non-staircase rooms receive a modifier draw.
///
/// Draws once from `random` only when more rooms remain than the extra chance.
pub fn special_room_budget(
    volume_count: usize,
    config: &RoomConfig,
    random: &mut RandomSource,
) -> usize {
    let remaining = volume_count.saturating_sub(2);
    let special = if remaining > config.extra_modifier_chance {
        random.next_usize(config.extra_modifier_chance, remaining)
    } else {
        remaining
    };
    special.saturating_sub(config.minimum_regular_rooms)
}

/// One modifier per volume, aligned with `volumes`. Staircases never get one.
pub fn assign_modifiers(
    volumes: &[Volume],
    stairs: Staircases,
    config: &RoomConfig,
    random: &mut RandomSource,
) -> Vec<RoomModifier> {
    let mut special = special_room_budget(volumes.len(), config, random);

    (0..volumes.len())
        .map(|i| {
            if stairs.contains(i) || special == 0 {
                return RoomModifier::None;
            }
            special -= 1;
            RoomModifier::random(random)
        })
        .collect()
}

/// Where a floor or ceiling slab goes
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SlabPlan {
    pub position: Vec3,
    /// Horizontal (x, z) size
    pub scale: Vec2,
}

/// A support column standing on a bottom footprint corner
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ColumnPlan {
    pub base: Vec3,
    pub side: FootprintSide,
    pub height: f32,
}

/// Everything a furnishing collaborator needs to build one room
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoomPlan {
    pub id: VolumeId,
    pub class: SizeClass,
    pub modifier: RoomModifier,
    pub top: Footprint,
    pub bottom: Footprint,
    pub scale: Vec3,
    pub center: Vec3,
    pub floor: SlabPlan,
    pub ceiling: Option<SlabPlan>,
    pub columns: Vec<ColumnPlan>,
}

impl RoomPlan {
    pub fn new(volume: &Volume, class: SizeClass, modifier: RoomModifier) -> Self {
        let top = volume.top();
        let bottom = volume.bottom();
        let horizontal = Vec2::new(volume.scale.x, volume.scale.z);

        let column_height = |side| top.corner(side).y - bottom.corner(side).y;
        let columns = match class {
            SizeClass::Regular => Vec::new(),
            SizeClass::Main => FootprintSide::ALL
                .iter()
                .map(|&side| ColumnPlan {
                    base: bottom.corner(side),
                    side,
                    height: column_height(side),
                })
                .collect(),
            SizeClass::StaircaseUp | SizeClass::StaircaseDown => FootprintSide::ALL
                .iter()
                .map(|&side| ColumnPlan {
                    base: bottom.corner(side),
                    side,
                    height: column_height(side) / ROOMS_STAIR_COLUMN_DIVISOR,
                })
                .collect(),
        };

        let ceiling = (class == SizeClass::Main).then_some(SlabPlan {
            position: top.center,
            scale: horizontal,
        });

        Self {
            id: volume.id,
            class,
            modifier,
            top,
            bottom,
            scale: volume.scale,
            center: bottom.center + Vec3::Y * ROOMS_CENTER_LIFT,
            floor: SlabPlan {
                position: bottom.center,
                scale: horizontal,
            },
            ceiling,
            columns,
        }
    }
}

/// Classified rooms plus the dungeon entry and exit
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoomLayout {
    pub rooms: Vec<RoomPlan>,
    /// Bottom center of the lowest room
    pub start: Option<Vec3>,
    /// Bottom center of the highest room
    pub end: Option<Vec3>,
}

impl RoomLayout {
    /// Non-staircase room ids grouped by modifier
    pub fn by_modifier(&self) -> BTreeMap<RoomModifier, Vec<VolumeId>> {
        let mut groups: BTreeMap<RoomModifier, Vec<VolumeId>> = BTreeMap::new();
        for room in self.rooms.iter().filter(|r| !r.class.is_staircase()) {
            groups.entry(room.modifier).or_default().push(room.id);
        }
        groups
    }

    pub fn staircase(&self, class: SizeClass) -> Option<&RoomPlan> {
        self.rooms.iter().find(|r| r.class == class)
    }
}

/// Classify `volumes` into rooms, drawing modifiers from `random`.
pub fn plan_rooms(
    volumes: &[Volume],
    config: &RoomConfig,
    random: &mut RandomSource,
) -> RoomLayout {
    puffin::profile_function!();

    let Some(stairs) = select_staircases(volumes) else {
        return RoomLayout::default();
    };
    let classes = staircase_classes(volumes, stairs);
    let modifiers = assign_modifiers(volumes, stairs, config, random);

    let rooms: Vec<RoomPlan> = volumes
        .iter()
        .zip(classes.iter().zip(&modifiers))
        .map(|(volume, (&class, &modifier))| RoomPlan::new(volume, class, modifier))
        .collect();

    let start = volumes[stairs.lowest].bottom().center;
    let mut end = volumes[stairs.highest].bottom().center;
    if end == start {
        end = (1..rooms.len())
            .rev()
            .find(|&i| rooms[i].class != SizeClass::Regular)
            .or(rooms.len().checked_sub(1))
            .map(|i| rooms[i].bottom.center)
            .unwrap_or(start);
    }

    let layout = RoomLayout {
        rooms,
        start: Some(start),
        end: Some(end),
    };

    tracing::debug!(
        target: "dungeon::rooms",
        rooms = layout.rooms.len(),
        highest = stairs.highest,
        lowest = stairs.lowest,
        modified = modifiers.iter().filter(|m| **m != RoomModifier::None).count(),
        "rooms.planned"
    );
    layout
}
