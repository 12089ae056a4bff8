//! Chunk request and geometry value types.
//!
//! These are the two messages that cross the compute-unit boundary: a
//! [`ChunkRequest`] goes in, a coordinate-tagged [`ChunkGeometry`] comes
//! back. Field names on both are a wire format shared with external
//! consumers and must not change.

use serde::{Deserialize, Serialize};
use strata_common::{ChunkCoord, WorldError, WorldResult};

/// A request to generate one chunk.
///
/// Plain value type with no shared state, safe to hand to an independent
/// compute unit, which reconstructs the full terrain field from `seed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkRequest {
    /// Chunk coordinate in chunk-grid space
    pub coordinate: ChunkCoord,
    /// Base seed counter for the terrain field
    pub seed: u32,
    /// World units per cell
    pub scale: f32,
    /// Cells per chunk edge
    #[serde(rename = "chunkSize")]
    pub chunk_size: u32,
}

/// Triangle-soup geometry for one chunk.
///
/// Flat sequences of position, normal, and color components. The three
/// buffers always hold the same number of `(x, y, z)` triples and each
/// length is a multiple of 3; the renderer indexes all three in lockstep
/// and depends on that invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkGeometry {
    /// Vertex positions, three components per vertex
    pub vertices: Vec<f32>,
    /// Vertex normals, three components per vertex
    pub normals: Vec<f32>,
    /// Vertex colors, three components per vertex
    pub colors: Vec<f32>,
}

impl ChunkGeometry {
    /// Creates empty geometry with capacity for `triples` vertices.
    #[must_use]
    pub fn with_capacity(triples: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(triples * 3),
            normals: Vec::with_capacity(triples * 3),
            colors: Vec::with_capacity(triples * 3),
        }
    }

    /// Number of `(x, y, z)` triples in each buffer.
    #[must_use]
    pub fn triple_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Whether the geometry holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Checks the structural invariant: equal buffer lengths, all
    /// multiples of 3.
    pub fn validate(&self) -> WorldResult<()> {
        let (v, n, c) = (self.vertices.len(), self.normals.len(), self.colors.len());
        if v != n || v != c || v % 3 != 0 {
            return Err(WorldError::MalformedGeometry {
                vertices: v,
                normals: n,
                colors: c,
            });
        }
        Ok(())
    }
}

/// A generated chunk ready for the scene, tagged with its coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedChunk {
    /// Originating chunk coordinate
    pub coordinate: ChunkCoord,
    /// The chunk's geometry; ownership transfers to the scene on consumption
    pub geometry: ChunkGeometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = ChunkRequest {
            coordinate: ChunkCoord::new(3, -2),
            seed: 7,
            scale: 16.0,
            chunk_size: 16,
        };
        let json = serde_json::to_value(&request).expect("serialize failed");
        assert_eq!(json["coordinate"]["x"], 3);
        assert_eq!(json["coordinate"]["y"], -2);
        assert_eq!(json["seed"], 7);
        assert_eq!(json["scale"], 16.0);
        assert_eq!(json["chunkSize"], 16);

        let back: ChunkRequest =
            serde_json::from_value(json).expect("deserialize failed");
        assert_eq!(back, request);
    }

    #[test]
    fn test_geometry_wire_format() {
        let geometry = ChunkGeometry {
            vertices: vec![0.0, 1.0, 2.0],
            normals: vec![0.0, 1.0, 0.0],
            colors: vec![0.5, 0.5, 0.5],
        };
        let json = serde_json::to_string(&geometry).expect("serialize failed");
        // Field names and order are the wire format.
        assert!(json.starts_with("{\"vertices\":"));
        assert!(json.contains("\"normals\":"));
        assert!(json.contains("\"colors\":"));

        let back: ChunkGeometry = serde_json::from_str(&json).expect("deserialize failed");
        assert_eq!(back, geometry);
    }

    #[test]
    fn test_geometry_validate() {
        let good = ChunkGeometry {
            vertices: vec![0.0; 9],
            normals: vec![0.0; 9],
            colors: vec![0.0; 9],
        };
        assert!(good.validate().is_ok());
        assert_eq!(good.triple_count(), 3);

        let bad = ChunkGeometry {
            vertices: vec![0.0; 9],
            normals: vec![0.0; 6],
            colors: vec![0.0; 9],
        };
        assert!(matches!(
            bad.validate(),
            Err(WorldError::MalformedGeometry { .. })
        ));

        let ragged = ChunkGeometry {
            vertices: vec![0.0; 4],
            normals: vec![0.0; 4],
            colors: vec![0.0; 4],
        };
        assert!(ragged.validate().is_err());
    }
}
