use chanman_common::geometry::{Position, Size};
use rand::Rng;

use crate::panel::EntitiesPanel;
use crate::store::PositionStore;

/// A whole-pixel top-left corner that keeps an `entity`-sized box inside `area`.
///
/// Entities wider or taller than the area are pinned to that axis' origin.
pub fn random_top_left<R: Rng>(rng: &mut R, area: Size, entity: Size) -> Position {
    let x = rng.random::<f32>() * (area.width - entity.width).max(0.0);
    let y = rng.random::<f32>() * (area.height - entity.height).max(0.0);
    Position::new(x, y).truncated()
}

/// Positions every new entity at its remembered spot, or at a random one if it has none.
pub fn place_new_entities<R: Rng>(
    panel: &mut EntitiesPanel,
    remembered: &PositionStore,
    rng: &mut R,
) {
    let area = panel.size();
    for entity in panel.entities_mut().filter(|entity| entity.is_new()) {
        let position = remembered
            .get(&entity.name)
            .unwrap_or_else(|| random_top_left(rng, area, entity.size()));
        entity.set_position(position);
    }
}
