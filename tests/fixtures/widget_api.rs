use serde::{Deserialize, Serialize};

/// A widget in the catalogue.
///
/// @description: A widget in the catalogue
/// @notes: Widgets are created by the catalogue
///     service and never deleted.
/// @property name: Display name
/// @property parts: Parts the widget is made of
/// @ptype parts: C{list} of L{Part}
/// @ptype size: integer
#[swagger::model]
#[derive(Debug, Serialize, Deserialize)]
pub struct Widget {
    pub name: String,
    pub size: u32,
    pub parts: Vec<Part>,
}

impl Widget {
    pub fn new(name: String, #[default = 5] size: u32) -> Self {
        Self {
            name,
            size,
            parts: Vec::new(),
        }
    }
}

/// @property sku: Stock keeping unit
#[swagger::model]
#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    pub sku: String,
    #[serde(default)]
    pub quantity: u32,
}

pub struct WidgetHandler;

impl WidgetHandler {
    /// @description: Fetch one widget
    /// @param id: Widget id
    /// @type id: integer
    /// @param expand: Include parts
    /// @required expand: false
    /// @rtype 200: Widget
    /// @return 200: The widget
    /// @raise 404: No such widget
    #[swagger::operation(path = "/widgets/{id}", nickname = "getWidget")]
    pub fn get(&self, id: u32, expand: Option<bool>) -> Option<Widget> {
        let _ = (id, expand);
        None
    }

    /// @description: Delete a widget
    /// @return 204: Deleted
    #[swagger::operation(path = "/widgets/{id}")]
    pub fn delete(&self, id: u32) {
        let _ = id;
    }
}

/// @description: List widgets
/// @param limit: Page size
/// @in limit: query
/// @author: nobody
#[swagger::operation(path = "/widgets", method = "get")]
pub fn list_widgets(#[default = 20] limit: u32) -> Vec<Widget> {
    let _ = limit;
    Vec::new()
}

/// @description: Internal health probe
#[swagger::operation(path = "/internal/health")]
pub fn health() {}

/// Destructuring cannot be documented.
#[swagger::operation(path = "/pairs")]
pub fn pairs((left, right): (u32, u32)) -> u32 {
    left + right
}
