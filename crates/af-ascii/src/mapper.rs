use af_core::charset::Ramp;
use af_core::frame::{AsciiGrid, LevelBuffer};

use crate::edge::EdgeMap;

/// Turn ramp indices (and optional edge classes) into characters.
///
/// Edge cells take their direction glyph; every other cell is a plain
/// ramp lookup. An edge map of different dimensions is ignored.
///
/// # Example
/// ```
/// use af_core::charset::Ramp;
/// use af_core::frame::LevelBuffer;
/// use af_ascii::mapper::map_levels;
///
/// let ramp = Ramp::new(" .:#@").unwrap();
/// let levels = LevelBuffer { levels: vec![0, 4, 2, 1], width: 2, height: 2 };
/// let grid = map_levels(&levels, None, &ramp);
/// assert_eq!(grid.cells, vec![' ', '@', ':', '.']);
/// ```
#[must_use]
pub fn map_levels(levels: &LevelBuffer, edges: Option<&EdgeMap>, ramp: &Ramp) -> AsciiGrid {
    let edges = edges.filter(|e| e.width == levels.width && e.height == levels.height);
    if edges.is_none() {
        log::trace!("mapping sans contours");
    }

    let cells = levels
        .levels
        .iter()
        .enumerate()
        .map(|(i, &index)| match edges.and_then(|e| e.classes[i]) {
            Some(class) => class.glyph(),
            None => ramp.glyph(index),
        })
        .collect();

    AsciiGrid {
        cells,
        width: levels.width,
        height: levels.height,
    }
}
