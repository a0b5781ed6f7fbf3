//! World coordinates to map image pixels.
//!
//! Each map is an affine remap centred on the image midpoint with an
//! independent scale ratio, direction and offset per axis. The parameters
//! are tuned against reference placements; changing any of them shifts
//! every plotted point on that map.

/// Orientation of a world axis relative to the image axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisDirection {
    Forward,
    Reverse,
}

impl AxisDirection {
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            AxisDirection::Forward => 1.0,
            AxisDirection::Reverse => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDefinition {
    pub selector: u8,
    pub name: &'static str,
    /// Image asset the parameters were tuned against.
    pub image: &'static str,
    pub image_width: f64,
    pub image_height: f64,
    pub range_x: f64,
    pub range_z: f64,
    pub scale_x: f64,
    pub scale_z: f64,
    pub direction_x: AxisDirection,
    pub direction_z: AxisDirection,
    pub offset_x: f64,
    pub offset_z: f64,
}

pub const MAPS: [MapDefinition; 4] = [
    MapDefinition {
        selector: 0,
        name: "Lumiose City",
        image: "lumiose.png",
        image_width: 4096.0,
        image_height: 4096.0,
        range_x: 3940.0,
        range_z: 3940.0,
        scale_x: 1000.0,
        scale_z: 1000.0,
        direction_x: AxisDirection::Reverse,
        direction_z: AxisDirection::Reverse,
        offset_x: 500.0,
        offset_z: 500.0,
    },
    MapDefinition {
        selector: 1,
        name: "Lysandre Labs",
        image: "LysandreLabs.png",
        image_width: 2160.0,
        image_height: 2160.0,
        range_x: 1662.0,
        range_z: 2041.0,
        scale_x: 1662.0 / 10.291021,
        scale_z: 2041.0 / 10.291021,
        direction_x: AxisDirection::Reverse,
        direction_z: AxisDirection::Reverse,
        offset_x: -3.0,
        offset_z: -80.0,
    },
    MapDefinition {
        selector: 2,
        name: "The Sewers",
        image: "Sewers.png",
        image_width: 2160.0,
        image_height: 2160.0,
        range_x: 1364.0,
        range_z: 1975.0,
        scale_x: 1364.0 / 6.2,
        scale_z: 1975.0 / 6.2,
        direction_x: AxisDirection::Forward,
        direction_z: AxisDirection::Forward,
        offset_x: 1.0,
        offset_z: 146.0,
    },
    MapDefinition {
        selector: 3,
        name: "The Sewers B",
        image: "SewersB.png",
        image_width: 2160.0,
        image_height: 2160.0,
        range_x: 1521.0,
        range_z: 1966.0,
        scale_x: 1521.0 / 16.714285,
        scale_z: 1966.0 / 16.714285,
        direction_x: AxisDirection::Forward,
        direction_z: AxisDirection::Forward,
        offset_x: 39.0,
        offset_z: 45.0,
    },
];

impl MapDefinition {
    pub fn lookup(selector: u8) -> Option<&'static MapDefinition> {
        MAPS.get(selector as usize)
    }

    /// Project world X/Z into this map's image pixel space. The result may
    /// lie outside the image; visibility is the renderer's call.
    pub fn project(&self, world_x: f64, world_z: f64) -> PixelPoint {
        PixelPoint {
            x: self.image_width / 2.0
                + self.direction_x.sign() * ((self.range_x / self.scale_x) * (world_x + self.offset_x)),
            y: self.image_height / 2.0
                + self.direction_z.sign() * ((self.range_z / self.scale_z) * (world_z + self.offset_z)),
        }
    }

    /// Pixel point as a fraction of the image size, for renderers that draw
    /// the image at a different resolution.
    pub fn normalize(&self, point: PixelPoint) -> PixelPoint {
        PixelPoint {
            x: point.x / self.image_width,
            y: point.y / self.image_height,
        }
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        (0.0..self.image_width).contains(&point.x) && (0.0..self.image_height).contains(&point.y)
    }
}

pub fn project(map: &MapDefinition, world_x: f64, world_z: f64) -> PixelPoint {
    map.project(world_x, world_z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn lookup_covers_every_selector() {
        for (index, map) in MAPS.iter().enumerate() {
            assert_eq!(map.selector as usize, index);
            assert_eq!(MapDefinition::lookup(index as u8), Some(map));
        }
        assert!(MapDefinition::lookup(4).is_none());
    }

    #[test]
    fn sewers_projection_matches_formula() {
        let map = MapDefinition::lookup(2).expect("sewers");
        let point = project(map, 10.0, 5.0);
        assert!(close(point.x, 1080.0 + 6.2 * 11.0), "x = {}", point.x);
        assert!(close(point.y, 1080.0 + 6.2 * 151.0), "y = {}", point.y);
    }

    #[test]
    fn lumiose_flips_both_axes() {
        let map = MapDefinition::lookup(0).expect("lumiose");
        // World origin sits 500 units from the offset centre.
        let origin = map.project(0.0, 0.0);
        assert!(close(origin.x, 2048.0 - 3.94 * 500.0));
        assert!(close(origin.y, 2048.0 - 3.94 * 500.0));
        let centre = map.project(-500.0, -500.0);
        assert!(close(centre.x, 2048.0) && close(centre.y, 2048.0));
        assert!(map.contains(centre));
    }

    #[test]
    fn displacement_is_linear_per_axis() {
        for map in MAPS.iter() {
            let base = map.project(3.0, -7.0);
            let one = map.project(3.0 + 25.0, -7.0);
            let two = map.project(3.0 + 50.0, -7.0);
            assert!(close(two.x - base.x, 2.0 * (one.x - base.x)));
            assert!(close(one.y, base.y));

            let one_z = map.project(3.0, -7.0 + 12.0);
            let two_z = map.project(3.0, -7.0 + 24.0);
            assert!(close(two_z.y - base.y, 2.0 * (one_z.y - base.y)));
            assert!(close(one_z.x, base.x));
        }
    }

    #[test]
    fn out_of_image_points_are_not_clipped() {
        let map = MapDefinition::lookup(3).expect("sewers b");
        let far = map.project(10_000.0, 10_000.0);
        assert!(far.x > map.image_width);
        assert!(!map.contains(far));
        let normalized = map.normalize(far);
        assert!(normalized.x > 1.0 && normalized.y > 1.0);
    }
}
