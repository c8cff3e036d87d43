//! Screen implementations. Each screen is a top-level Component.

pub mod facilities;
pub mod map;

use hivemap_core::DashboardConfig;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens(config: &DashboardConfig) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Map, Box::new(map::MapScreen::new(config))),
        (
            ScreenId::Facilities,
            Box::new(facilities::FacilitiesScreen::new(config)),
        ),
    ]
}
