//! Color mapping for terrain classes

use super::TerrainType;

/// RGBA color type
pub type TerrainColor = [f32; 4];

/// Trait for mapping terrain types to colors
pub trait ColorMapper<T> {
    /// Map a terrain type to an RGBA color
    fn map_color(&self, terrain: &T) -> TerrainColor;
}

/// Default color mapper for [`TerrainType`]
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicColorMapper;

impl ColorMapper<TerrainType> for BasicColorMapper {
    fn map_color(&self, terrain: &TerrainType) -> TerrainColor {
        match terrain {
            TerrainType::Water => [0.1, 0.3, 0.7, 1.0],    // Deep blue
            TerrainType::Land => [0.2, 0.6, 0.2, 1.0],     // Green
            TerrainType::Mountain => [0.5, 0.5, 0.5, 1.0], // Gray
        }
    }
}

/// Custom color mapper with per-class colors
#[derive(Debug, Clone)]
pub struct CustomColorMapper {
    pub water: TerrainColor,
    pub land: TerrainColor,
    pub mountain: TerrainColor,
}

impl Default for CustomColorMapper {
    fn default() -> Self {
        Self {
            water: [0.1, 0.3, 0.7, 1.0],
            land: [0.2, 0.6, 0.2, 1.0],
            mountain: [0.5, 0.5, 0.5, 1.0],
        }
    }
}

impl ColorMapper<TerrainType> for CustomColorMapper {
    fn map_color(&self, terrain: &TerrainType) -> TerrainColor {
        match terrain {
            TerrainType::Water => self.water,
            TerrainType::Land => self.land,
            TerrainType::Mountain => self.mountain,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_color_mapper() {
        let mapper = BasicColorMapper;

        let water = mapper.map_color(&TerrainType::Water);
        assert_eq!(water[3], 1.0);
        assert!(water[2] > 0.5);

        let land = mapper.map_color(&TerrainType::Land);
        assert!(land[1] > 0.5);
    }

    #[test]
    fn test_custom_color_mapper() {
        let mapper = CustomColorMapper {
            mountain: [1.0, 1.0, 1.0, 1.0],
            ..Default::default()
        };
        assert_eq!(mapper.map_color(&TerrainType::Mountain), [1.0; 4]);
        assert_eq!(
            mapper.map_color(&TerrainType::Water),
            BasicColorMapper.map_color(&TerrainType::Water)
        );
    }
}
