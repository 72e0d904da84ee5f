use serde::{Deserialize, Serialize};

/// Vehicle record as returned by `/api/vehiculos/buscar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    #[serde(default)]
    pub matricula: Option<String>,
    #[serde(default)]
    pub bastidor: Option<String>,
    #[serde(default)]
    pub referencia: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub tag_id: Option<i64>,
}

impl Vehicle {
    /// Label shown to the user: reference, then plate, then VIN, then id.
    pub fn display_reference(&self) -> String {
        [&self.referencia, &self.matricula, &self.bastidor]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// UWB tag linked to a vehicle. The API answers with an error object
/// instead when no tag is assigned, hence the optional id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub bateria: Option<i64>,
    #[serde(default)]
    pub vehiculo_id: Option<i64>,
}

/// Last known position of a tag, in floor-plan units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub tag_id: Option<i64>,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub zona_id: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Marker coordinates on the floor-plan SVG.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPosition {
    pub x: f64,
    pub y: f64,
}

impl From<&Position> for MarkerPosition {
    fn from(pos: &Position) -> Self {
        Self { x: pos.x, y: pos.y }
    }
}

/// Layout regions that receive fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Sidebar,
    Header,
    Footer,
    Main,
}

impl Slot {
    pub const LAYOUT: [Slot; 3] = [Slot::Sidebar, Slot::Header, Slot::Footer];

    pub fn container_id(self) -> &'static str {
        match self {
            Slot::Sidebar => "sidebar-container",
            Slot::Header => "header-container",
            Slot::Footer => "footer-container",
            Slot::Main => "main-content",
        }
    }

    /// Component fragment name for layout slots.
    pub fn component_name(self) -> Option<&'static str> {
        match self {
            Slot::Sidebar => Some("sidebar"),
            Slot::Header => Some("header"),
            Slot::Footer => Some("footer"),
            Slot::Main => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vehicle_decodes_api_shape() {
        let raw = r#"[{"id": 7, "matricula": "1234ABC", "bastidor": null,
            "referencia": "ABC1234", "estado": "activo", "tag_id": 42}]"#;
        let vehicles: Vec<Vehicle> = serde_json::from_str(raw).unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].id, 7);
        assert_eq!(vehicles[0].tag_id, Some(42));
        assert_eq!(vehicles[0].display_reference(), "ABC1234");
    }

    #[test]
    fn display_reference_falls_back() {
        let mut v: Vehicle = serde_json::from_str(r#"{"id": 3, "matricula": "0000XYZ"}"#).unwrap();
        assert_eq!(v.display_reference(), "0000XYZ");
        v.matricula = Some("  ".into());
        v.bastidor = Some("VF1234".into());
        assert_eq!(v.display_reference(), "VF1234");
        v.bastidor = None;
        assert_eq!(v.display_reference(), "3");
    }

    #[test]
    fn tag_error_body_has_no_id() {
        let tag: Tag =
            serde_json::from_str(r#"{"error": "El vehículo no tiene un tag asignado"}"#).unwrap();
        assert_eq!(tag.id, None);
    }

    #[test]
    fn position_accepts_integer_coordinates() {
        let pos: Position = serde_json::from_str(
            r#"{"id": 1, "tag_id": 42, "x": 120, "y": 80, "zona_id": null,
                "timestamp": "2024-05-02T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(MarkerPosition::from(&pos), MarkerPosition { x: 120.0, y: 80.0 });
    }

    #[test]
    fn slots_map_to_containers() {
        assert_eq!(Slot::Main.container_id(), "main-content");
        assert_eq!(Slot::Main.component_name(), None);
        let names: Vec<_> = Slot::LAYOUT.iter().filter_map(|s| s.component_name()).collect();
        assert_eq!(names, ["sidebar", "header", "footer"]);
    }
}
