// ── Built-in terminal layouts, one per facility type ──

use std::time::Duration;

use super::{ButtonAction, LedColor, LedRule, Level, TabSpec, TerminalSchema, Widget, Zone};
use crate::model::FacilityType;
use crate::telemetry::SignalSpec;

// ── Widget builders ──────────────────────────────────────────────────

const fn gauge(
    label: &'static str,
    signal: &'static str,
    unit: &'static str,
    min: f64,
    max: f64,
    zones: &'static [Zone],
) -> Widget {
    Widget::Gauge {
        label,
        signal,
        unit,
        min,
        max,
        zones,
    }
}

const fn display(label: &'static str, signal: &'static str, unit: &'static str, decimals: usize) -> Widget {
    Widget::Display {
        label,
        signal,
        unit,
        decimals,
        alarm_above: None,
    }
}

const fn alarm(
    label: &'static str,
    signal: &'static str,
    unit: &'static str,
    decimals: usize,
    above: f64,
) -> Widget {
    Widget::Display {
        label,
        signal,
        unit,
        decimals,
        alarm_above: Some(above),
    }
}

const fn toggle(key: &'static str, label: &'static str, default: bool) -> Widget {
    Widget::Toggle {
        key,
        label,
        default,
    }
}

const fn led(label: &'static str, rule: LedRule) -> Widget {
    Widget::Led { label, rule }
}

const fn slider(signal: &'static str, label: &'static str, min: f64, max: f64, unit: &'static str) -> Widget {
    Widget::Slider {
        signal,
        label,
        min,
        max,
        unit,
    }
}

const fn log_button(label: &'static str, message: &'static str) -> Widget {
    Widget::Button {
        label,
        action: ButtonAction::Log(message),
        confirm: false,
    }
}

const fn between(signal: &'static str, low: f64, high: f64) -> LedRule {
    LedRule::Between {
        signal,
        low,
        high,
        hit: LedColor::Green,
        otherwise: LedColor::Red,
    }
}

const fn below(signal: &'static str, threshold: f64) -> LedRule {
    LedRule::Below {
        signal,
        threshold,
        hit: LedColor::Green,
        otherwise: LedColor::Red,
    }
}

const fn above_warn(signal: &'static str, threshold: f64) -> LedRule {
    LedRule::Above {
        signal,
        threshold,
        hit: LedColor::Yellow,
        otherwise: LedColor::Green,
    }
}

const fn switched(key: &'static str) -> LedRule {
    LedRule::Toggle {
        key,
        on: LedColor::Green,
        off: LedColor::Red,
    }
}

const EMERGENCY_BUTTON: Widget = Widget::Button {
    label: "Emergency shutdown",
    action: ButtonAction::EmergencyShutdown,
    confirm: true,
};

const EMERGENCY_LED: Widget = led("Emergency", LedRule::Emergency);

const PERCENT: &[Zone] = &[
    Zone::new(70.0, Level::Normal),
    Zone::new(90.0, Level::Warning),
    Zone::new(100.0, Level::Danger),
];

const FILL: &[Zone] = &[
    Zone::new(20.0, Level::Danger),
    Zone::new(40.0, Level::Warning),
    Zone::new(100.0, Level::Normal),
];

const CORE_TEMP: &[Zone] = &[
    Zone::new(500.0, Level::Normal),
    Zone::new(800.0, Level::Warning),
    Zone::new(3000.0, Level::Danger),
];

const TURBINE_RPM: &[Zone] = &[
    Zone::new(2500.0, Level::Warning),
    Zone::new(3500.0, Level::Normal),
    Zone::new(3600.0, Level::Danger),
];

const VISIBILITY: &[Zone] = &[
    Zone::new(3.0, Level::Danger),
    Zone::new(6.0, Level::Warning),
    Zone::new(20.0, Level::Normal),
];

const AIRCRAFT: &[Zone] = &[
    Zone::new(35.0, Level::Normal),
    Zone::new(45.0, Level::Warning),
    Zone::new(50.0, Level::Danger),
];

const ICU_BEDS: &[Zone] = &[
    Zone::new(16.0, Level::Normal),
    Zone::new(21.0, Level::Warning),
    Zone::new(24.0, Level::Danger),
];

const TRAINS: &[Zone] = &[
    Zone::new(8.0, Level::Danger),
    Zone::new(16.0, Level::Warning),
    Zone::new(32.0, Level::Normal),
];

const CAMERAS: &[Zone] = &[
    Zone::new(30.0, Level::Danger),
    Zone::new(40.0, Level::Warning),
    Zone::new(50.0, Level::Normal),
];

const SHIPS: &[Zone] = &[
    Zone::new(9.0, Level::Normal),
    Zone::new(11.0, Level::Warning),
    Zone::new(12.0, Level::Danger),
];

const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

// ── Power plant ──────────────────────────────────────────────────────

static POWER: TerminalSchema = TerminalSchema {
    kind: FacilityType::Power,
    title: "Power plant control",
    tick: ms(2000),
    signals: &[
        SignalSpec::walk("coreTemp", 320.0, 0.0, 3000.0, 20.0),
        SignalSpec::walk("neutronFlux", 75.0, 60.0, 90.0, 3.0),
        SignalSpec::walk("coolantPressure", 155.0, 0.0, 250.0, 4.0),
        SignalSpec::walk("radiation", 0.5, 0.0, 5.0, 0.1),
        SignalSpec::walk("turbineRpm", 3000.0, 0.0, 3600.0, 40.0),
        SignalSpec::walk("steamTemp", 180.0, 0.0, 400.0, 5.0),
        SignalSpec::jitter("genFrequency", 49.9, 0.2),
        SignalSpec::jitter("vibration", 2.0, 1.0),
        SignalSpec::walk("output", 1200.0, 0.0, 1500.0, 30.0),
        SignalSpec::jitter("voltage", 395.0, 10.0),
        SignalSpec::steady("controlRods", 65.0, 0.0, 100.0),
    ],
    tabs: &[
        TabSpec {
            title: "Reactor",
            widgets: &[
                gauge(
                    "Core temperature",
                    "coreTemp",
                    "°C",
                    0.0,
                    3000.0,
                    CORE_TEMP,
                ),
                display("Neutron flux", "neutronFlux", "%", 1),
                display("Coolant pressure", "coolantPressure", "bar", 1),
                alarm("Radiation", "radiation", "mSv/h", 2, 1.0),
                slider("controlRods", "Control rods", 0.0, 100.0, "%"),
                led("Reactor", below("coreTemp", 800.0)),
                led("Cooling", between("coolantPressure", 100.0, 185.0)),
                led(
                    "Radiation",
                    LedRule::Above {
                        signal: "radiation",
                        threshold: 1.0,
                        hit: LedColor::Red,
                        otherwise: LedColor::Green,
                    },
                ),
            ],
        },
        TabSpec {
            title: "Turbine",
            widgets: &[
                gauge("Turbine speed", "turbineRpm", "rpm", 0.0, 3600.0, TURBINE_RPM),
                display("Steam temperature", "steamTemp", "°C", 1),
                display("Generator frequency", "genFrequency", "Hz", 2),
                alarm("Vibration", "vibration", "mm/s", 2, 2.8),
                led(
                    "Turbines",
                    LedRule::Between {
                        signal: "turbineRpm",
                        low: 2500.0,
                        high: 3500.0,
                        hit: LedColor::Green,
                        otherwise: LedColor::Yellow,
                    },
                ),
            ],
        },
        TabSpec {
            title: "Grid",
            widgets: &[
                display("Output", "output", "MW", 0),
                display("Voltage", "voltage", "kV", 1),
                toggle("mainBreaker", "Main breaker", true),
                toggle("backupBreaker", "Backup breaker", false),
                toggle("grid1", "Grid feeder 1", true),
                toggle("grid2", "Grid feeder 2", true),
                toggle("grid3", "Grid feeder 3", false),
                led("Grid", switched("mainBreaker")),
            ],
        },
        TabSpec {
            title: "Emergency",
            widgets: &[
                toggle("backupGenerator", "Backup generator", false),
                toggle("fireSuppression", "Fire suppression", true),
                EMERGENCY_LED,
                log_button("Run diagnostics", "Diagnostics completed"),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("coreTemp", 100.0), ("output", 0.0), ("turbineRpm", 0.0)],
};

// ── Airport ──────────────────────────────────────────────────────────

static AIRPORT: TerminalSchema = TerminalSchema {
    kind: FacilityType::Airport,
    title: "Airport operations",
    tick: ms(3000),
    signals: &[
        SignalSpec::walk("windSpeed", 12.0, 0.0, 60.0, 3.0),
        SignalSpec::walk("windDirection", 240.0, 0.0, 359.0, 10.0),
        SignalSpec::walk("visibility", 10.0, 0.0, 20.0, 1.0),
        SignalSpec::walk("ceiling", 2500.0, 0.0, 10000.0, 200.0),
        SignalSpec::walk("aircraft", 18.0, 0.0, 50.0, 3.0),
    ],
    tabs: &[
        TabSpec {
            title: "Tower",
            widgets: &[
                display("Wind speed", "windSpeed", "kt", 0),
                display("Wind direction", "windDirection", "°", 0),
                gauge("Visibility", "visibility", "km", 0.0, 20.0, VISIBILITY),
                display("Cloud ceiling", "ceiling", "ft", 0),
                led(
                    "Visual approach",
                    LedRule::Above {
                        signal: "visibility",
                        threshold: 5.0,
                        hit: LedColor::Green,
                        otherwise: LedColor::Yellow,
                    },
                ),
            ],
        },
        TabSpec {
            title: "Radar",
            widgets: &[
                gauge("Aircraft tracked", "aircraft", "", 0.0, 50.0, AIRCRAFT),
                led("Traffic load", above_warn("aircraft", 40.0)),
            ],
        },
        TabSpec {
            title: "Gates",
            widgets: &[
                toggle("runway09L", "Runway 09L", true),
                toggle("runway09R", "Runway 09R", true),
                toggle("runway27L", "Runway 27L", false),
                toggle("runway27R", "Runway 27R", false),
                toggle("gatesA", "Gates A", true),
                toggle("gatesB", "Gates B", true),
                led("Runways", switched("runway09L")),
            ],
        },
        TabSpec {
            title: "Emergency",
            widgets: &[
                EMERGENCY_LED,
                log_button("Ground stop", "Ground stop issued"),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("aircraft", 0.0)],
};

// ── Bridge ───────────────────────────────────────────────────────────

static BRIDGE: TerminalSchema = TerminalSchema {
    kind: FacilityType::Bridge,
    title: "Bridge monitoring",
    tick: ms(3000),
    signals: &[
        SignalSpec::walk("vehicles", 2400.0, 0.0, 6000.0, 150.0),
        SignalSpec::walk("avgSpeed", 70.0, 0.0, 100.0, 6.0),
        SignalSpec::walk("cableTension", 55.0, 0.0, 100.0, 4.0),
        SignalSpec::jitter("deckVibration", 0.5, 1.5),
        SignalSpec::walk("wind", 20.0, 0.0, 120.0, 5.0),
        SignalSpec::jitter("deckTemp", 12.0, 6.0),
    ],
    tabs: &[
        TabSpec {
            title: "Traffic",
            widgets: &[
                display("Vehicles", "vehicles", "/h", 0),
                gauge("Average speed", "avgSpeed", "km/h", 0.0, 100.0, PERCENT),
                toggle("lane1", "Lane 1", true),
                toggle("lane2", "Lane 2", true),
                toggle("lane3", "Lane 3", true),
                toggle("lane4", "Lane 4", false),
                toggle("toll", "Toll station", true),
            ],
        },
        TabSpec {
            title: "Structure",
            widgets: &[
                gauge("Cable tension", "cableTension", "%", 0.0, 100.0, PERCENT),
                alarm("Deck vibration", "deckVibration", "mm/s", 2, 1.8),
                display("Wind", "wind", "km/h", 0),
                display("Deck temperature", "deckTemp", "°C", 1),
                led("Structure", below("cableTension", 85.0)),
                led("Wind", above_warn("wind", 80.0)),
            ],
        },
        TabSpec {
            title: "Systems",
            widgets: &[
                toggle("lighting", "Lighting", true),
                toggle("drawbridge", "Drawbridge raised", false),
                led("Lighting", switched("lighting")),
                EMERGENCY_LED,
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("vehicles", 0.0), ("avgSpeed", 0.0)],
};

// ── City hall ────────────────────────────────────────────────────────

static CITY_HALL: TerminalSchema = TerminalSchema {
    kind: FacilityType::CityHall,
    title: "City administration",
    tick: ms(4000),
    signals: &[
        SignalSpec::walk("services", 140.0, 0.0, 400.0, 12.0),
        SignalSpec::walk("dbLoad", 45.0, 0.0, 100.0, 8.0),
        SignalSpec::jitter("temperature", 21.0, 2.0),
        SignalSpec::walk("occupancy", 220.0, 0.0, 500.0, 20.0),
    ],
    tabs: &[
        TabSpec {
            title: "Services",
            widgets: &[
                display("Citizen services", "services", "/day", 0),
                gauge("Database load", "dbLoad", "%", 0.0, 100.0, PERCENT),
                display("Occupancy", "occupancy", "", 0),
                led("Database", below("dbLoad", 90.0)),
            ],
        },
        TabSpec {
            title: "Departments",
            widgets: &[
                toggle("administration", "Administration", true),
                toggle("planning", "Planning", true),
                toggle("finance", "Finance", true),
                toggle("publicWorks", "Public works", true),
                display("Temperature", "temperature", "°C", 1),
                log_button("Lock down building", "Building locked down"),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("occupancy", 0.0)],
};

// ── Control center ───────────────────────────────────────────────────

static CONTROL: TerminalSchema = TerminalSchema {
    kind: FacilityType::Control,
    title: "Control center",
    tick: ms(3000),
    signals: &[
        SignalSpec::walk("systemStatus", 92.0, 0.0, 100.0, 3.0),
        SignalSpec::walk("connections", 340.0, 0.0, 1000.0, 25.0),
        SignalSpec::walk("dataFlow", 4.2, 0.0, 10.0, 0.6),
        SignalSpec::walk("cpu", 38.0, 0.0, 100.0, 8.0),
        SignalSpec::walk("memory", 61.0, 0.0, 100.0, 5.0),
        SignalSpec::walk("bandwidth", 55.0, 0.0, 100.0, 8.0),
        SignalSpec::walk("latency", 12.0, 1.0, 200.0, 4.0),
    ],
    tabs: &[
        TabSpec {
            title: "Overview",
            widgets: &[
                gauge("System status", "systemStatus", "%", 0.0, 100.0, FILL),
                display("Connections", "connections", "", 0),
                display("Data flow", "dataFlow", "GB/s", 1),
                led("Systems", LedRule::Above {
                    signal: "systemStatus",
                    threshold: 80.0,
                    hit: LedColor::Green,
                    otherwise: LedColor::Yellow,
                }),
            ],
        },
        TabSpec {
            title: "Resources",
            widgets: &[
                gauge("CPU", "cpu", "%", 0.0, 100.0, PERCENT),
                gauge("Memory", "memory", "%", 0.0, 100.0, PERCENT),
                gauge("Bandwidth", "bandwidth", "%", 0.0, 100.0, PERCENT),
                alarm("Latency", "latency", "ms", 0, 100.0),
            ],
        },
        TabSpec {
            title: "Links",
            widgets: &[
                toggle("primary", "Primary link", true),
                toggle("secondary", "Secondary link", true),
                toggle("backup", "Backup link", false),
                toggle("monitoring", "Monitoring", true),
                led("Primary", switched("primary")),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("dataFlow", 0.0), ("connections", 0.0)],
};

// ── Energy / substation ──────────────────────────────────────────────

static ENERGY: TerminalSchema = TerminalSchema {
    kind: FacilityType::Energy,
    title: "Grid operations",
    tick: ms(2000),
    signals: &[
        SignalSpec::walk("totalOutput", 8400.0, 0.0, 12000.0, 200.0),
        SignalSpec::walk("gridLoad", 68.0, 0.0, 100.0, 5.0),
        SignalSpec::jitter("voltage", 395.0, 10.0),
        SignalSpec::jitter("frequency", 49.9, 0.2),
        SignalSpec::walk("demand", 8100.0, 0.0, 12000.0, 200.0),
        SignalSpec::walk("stability", 94.0, 0.0, 100.0, 3.0),
        SignalSpec::walk("battery", 72.0, 0.0, 100.0, 4.0),
    ],
    tabs: &[
        TabSpec {
            title: "Grid",
            widgets: &[
                display("Total output", "totalOutput", "MW", 0),
                display("Demand", "demand", "MW", 0),
                gauge("Grid load", "gridLoad", "%", 0.0, 100.0, PERCENT),
                display("Voltage", "voltage", "kV", 1),
                display("Frequency", "frequency", "Hz", 2),
                led("Frequency", between("frequency", 49.8, 50.2)),
            ],
        },
        TabSpec {
            title: "Generation",
            widgets: &[
                toggle("coal", "Coal", true),
                toggle("gas", "Gas", true),
                toggle("nuclear", "Nuclear", false),
                toggle("hydro", "Hydro", true),
                toggle("wind", "Wind", true),
                toggle("solar", "Solar", true),
                gauge("Stability", "stability", "%", 0.0, 100.0, FILL),
                gauge("Battery storage", "battery", "%", 0.0, 100.0, FILL),
            ],
        },
        TabSpec {
            title: "Substations",
            widgets: &[
                toggle("subA", "Substation A", true),
                toggle("subB", "Substation B", true),
                toggle("subC", "Substation C", false),
                toggle("subD", "Substation D", true),
                led("Substation A", switched("subA")),
                EMERGENCY_LED,
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("totalOutput", 0.0), ("gridLoad", 0.0)],
};

// ── Fire station ─────────────────────────────────────────────────────

static FIRE: TerminalSchema = TerminalSchema {
    kind: FacilityType::Fire,
    title: "Fire station dispatch",
    tick: ms(5000),
    signals: &[
        SignalSpec::walk("alarms", 2.0, 0.0, 10.0, 1.5),
        SignalSpec::jitter("responseTime", 3.0, 3.0),
        SignalSpec::walk("water", 88.0, 0.0, 100.0, 3.0),
        SignalSpec::walk("foam", 76.0, 0.0, 100.0, 3.0),
    ],
    tabs: &[
        TabSpec {
            title: "Dispatch",
            widgets: &[
                alarm("Active alarms", "alarms", "", 0, 6.0),
                display("Response time", "responseTime", "min", 1),
                led("Readiness", below("alarms", 8.0)),
                log_button("Sound station alarm", "Station alarm sounded"),
            ],
        },
        TabSpec {
            title: "Vehicles",
            widgets: &[
                toggle("engine1", "Engine 1", true),
                toggle("engine2", "Engine 2", true),
                toggle("ladder", "Ladder truck", true),
                toggle("rescue", "Rescue unit", false),
                gauge("Water tank", "water", "%", 0.0, 100.0, FILL),
                gauge("Foam reserve", "foam", "%", 0.0, 100.0, FILL),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("alarms", 0.0)],
};

// ── Government ───────────────────────────────────────────────────────

static GOV: TerminalSchema = TerminalSchema {
    kind: FacilityType::Gov,
    title: "Government security",
    tick: ms(3000),
    signals: &[
        SignalSpec::walk("badges", 420.0, 0.0, 1200.0, 30.0),
        SignalSpec::walk("calls", 35.0, 0.0, 200.0, 8.0),
        SignalSpec::jitter("serverRoomTemp", 20.0, 4.0),
    ],
    tabs: &[
        TabSpec {
            title: "Access",
            widgets: &[
                display("Badge scans", "badges", "", 0),
                toggle("mainEntrance", "Main entrance", true),
                toggle("staffEntrance", "Staff entrance", true),
                toggle("garage", "Garage", false),
                toggle("secureWing", "Secure wing", false),
                led("Secure wing", LedRule::Toggle {
                    key: "secureWing",
                    on: LedColor::Yellow,
                    off: LedColor::Green,
                }),
            ],
        },
        TabSpec {
            title: "Operations",
            widgets: &[
                display("Open calls", "calls", "", 0),
                alarm("Server room", "serverRoomTemp", "°C", 1, 23.0),
                led("Climate", below("serverRoomTemp", 23.5)),
                EMERGENCY_LED,
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("badges", 0.0)],
};

// ── Hospital ─────────────────────────────────────────────────────────

static HOSPITAL: TerminalSchema = TerminalSchema {
    kind: FacilityType::Hospital,
    title: "Hospital systems",
    tick: ms(4000),
    signals: &[
        SignalSpec::walk("erPatients", 14.0, 0.0, 60.0, 3.0),
        SignalSpec::walk("icuBeds", 17.0, 0.0, 24.0, 1.5),
        SignalSpec::walk("oxygen", 4.8, 0.0, 8.0, 0.3),
        SignalSpec::jitter("temperature", 20.0, 3.0),
    ],
    tabs: &[
        TabSpec {
            title: "Patients",
            widgets: &[
                display("ER patients", "erPatients", "", 0),
                gauge("ICU beds in use", "icuBeds", "", 0.0, 24.0, ICU_BEDS),
                led("ICU capacity", below("icuBeds", 22.0)),
            ],
        },
        TabSpec {
            title: "Facilities",
            widgets: &[
                display("Oxygen pressure", "oxygen", "bar", 1),
                display("Temperature", "temperature", "°C", 1),
                toggle("trauma1", "Trauma room 1", true),
                toggle("trauma2", "Trauma room 2", true),
                toggle("backupGenerator", "Backup generator", false),
                led("Oxygen", between("oxygen", 4.0, 6.0)),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("erPatients", 0.0)],
};

// ── Metro ────────────────────────────────────────────────────────────

static METRO: TerminalSchema = TerminalSchema {
    kind: FacilityType::Metro,
    title: "Metro operations",
    tick: ms(3000),
    signals: &[
        SignalSpec::walk("trains", 24.0, 0.0, 32.0, 2.0),
        SignalSpec::walk("passengers", 18000.0, 0.0, 40000.0, 1500.0),
        SignalSpec::walk("speed", 52.0, 0.0, 80.0, 5.0),
        SignalSpec::walk("track", 91.0, 0.0, 100.0, 2.0),
        SignalSpec::jitter("powerRail", 740.0, 20.0),
        SignalSpec::walk("delay", 1.5, 0.0, 30.0, 1.0),
    ],
    tabs: &[
        TabSpec {
            title: "Network",
            widgets: &[
                gauge("Trains in service", "trains", "", 0.0, 32.0, TRAINS),
                display("Passengers", "passengers", "/h", 0),
                display("Average speed", "speed", "km/h", 0),
                alarm("Average delay", "delay", "min", 1, 5.0),
            ],
        },
        TabSpec {
            title: "Lines",
            widgets: &[
                toggle("red", "Red line", true),
                toggle("blue", "Blue line", true),
                toggle("green", "Green line", true),
                toggle("yellow", "Yellow line", false),
                gauge("Track condition", "track", "%", 0.0, 100.0, FILL),
                display("Power rail", "powerRail", "V", 0),
                led("Power rail", between("powerRail", 730.0, 770.0)),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("speed", 0.0), ("trains", 0.0)],
};

// ── Military base ────────────────────────────────────────────────────

static BASE: TerminalSchema = TerminalSchema {
    kind: FacilityType::Base,
    title: "Base command",
    tick: ms(4000),
    signals: &[
        SignalSpec::walk("airTargets", 3.0, 0.0, 20.0, 2.0),
        SignalSpec::jitter("personnel", 840.0, 20.0),
        SignalSpec::walk("ammo", 82.0, 0.0, 100.0, 2.0),
        SignalSpec::walk("fuel", 67.0, 0.0, 100.0, 2.0),
    ],
    tabs: &[
        TabSpec {
            title: "Airspace",
            widgets: &[
                alarm("Air targets", "airTargets", "", 0, 10.0),
                toggle("sectorN", "Sector north", true),
                toggle("sectorS", "Sector south", true),
                toggle("sectorE", "Sector east", true),
                toggle("sectorW", "Sector west", true),
                led("Airspace", above_warn("airTargets", 10.0)),
            ],
        },
        TabSpec {
            title: "Logistics",
            widgets: &[
                display("Personnel", "personnel", "", 0),
                gauge("Ammunition", "ammo", "%", 0.0, 100.0, FILL),
                gauge("Fuel", "fuel", "%", 0.0, 100.0, FILL),
            ],
        },
        TabSpec {
            title: "Security",
            widgets: &[
                toggle("gates", "Gates", true),
                toggle("bunker", "Bunker sealed", false),
                led("Gates", switched("gates")),
                EMERGENCY_LED,
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("airTargets", 0.0)],
};

// ── Police ───────────────────────────────────────────────────────────

static POLICE: TerminalSchema = TerminalSchema {
    kind: FacilityType::Police,
    title: "Police dispatch",
    tick: ms(4000),
    signals: &[
        SignalSpec::walk("calls", 9.0, 0.0, 30.0, 3.0),
        SignalSpec::walk("priorityCalls", 2.0, 0.0, 10.0, 1.5),
        SignalSpec::walk("cameras", 46.0, 0.0, 50.0, 2.0),
        SignalSpec::walk("detainees", 4.0, 0.0, 40.0, 2.0),
    ],
    tabs: &[
        TabSpec {
            title: "Dispatch",
            widgets: &[
                display("Open calls", "calls", "", 0),
                alarm("Priority 1 calls", "priorityCalls", "", 0, 5.0),
                display("Detainees", "detainees", "", 0),
                led("Priority load", above_warn("priorityCalls", 5.0)),
            ],
        },
        TabSpec {
            title: "Districts",
            widgets: &[
                toggle("downtown", "Downtown", true),
                toggle("harbor", "Harbor", true),
                toggle("industrial", "Industrial", true),
                toggle("residential", "Residential", false),
                gauge("Cameras online", "cameras", "", 0.0, 50.0, CAMERAS),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("calls", 0.0)],
};

// ── Port ─────────────────────────────────────────────────────────────

static PORT: TerminalSchema = TerminalSchema {
    kind: FacilityType::Port,
    title: "Port authority",
    tick: ms(4000),
    signals: &[
        SignalSpec::walk("ships", 7.0, 0.0, 12.0, 1.5),
        SignalSpec::walk("waveHeight", 1.2, 0.0, 8.0, 0.3),
        SignalSpec::walk("vessels", 64.0, 0.0, 200.0, 6.0),
    ],
    tabs: &[
        TabSpec {
            title: "Harbor",
            widgets: &[
                gauge("Ships at berth", "ships", "", 0.0, 12.0, SHIPS),
                alarm("Wave height", "waveHeight", "m", 1, 3.0),
                display("Vessels tracked", "vessels", "", 0),
                led("Sea state", below("waveHeight", 3.0)),
            ],
        },
        TabSpec {
            title: "Zones",
            widgets: &[
                toggle("commercial", "Commercial zone", true),
                toggle("restricted", "Restricted zone", true),
                toggle("fuel", "Fuel terminal", false),
                led("Fuel terminal", LedRule::Toggle {
                    key: "fuel",
                    on: LedColor::Yellow,
                    off: LedColor::Off,
                }),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("ships", 0.0)],
};

// ── School ───────────────────────────────────────────────────────────

static SCHOOL: TerminalSchema = TerminalSchema {
    kind: FacilityType::School,
    title: "School management",
    tick: ms(4000),
    signals: &[
        SignalSpec::walk("students", 430.0, 0.0, 520.0, 15.0),
        SignalSpec::walk("library", 18.0, 0.0, 50.0, 3.0),
        SignalSpec::jitter("temperature", 20.0, 3.0),
    ],
    tabs: &[
        TabSpec {
            title: "Campus",
            widgets: &[
                display("Students present", "students", "", 0),
                display("Library visitors", "library", "", 0),
                display("Temperature", "temperature", "°C", 1),
                led("Climate", between("temperature", 19.0, 23.0)),
            ],
        },
        TabSpec {
            title: "Buildings",
            widgets: &[
                toggle("mainWing", "Main wing", true),
                toggle("scienceWing", "Science wing", true),
                toggle("gym", "Gym", false),
                toggle("doors", "Doors unlocked", true),
                log_button("Fire drill", "Fire drill started"),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("students", 0.0)],
};

// ── Data center ──────────────────────────────────────────────────────

static SERVER: TerminalSchema = TerminalSchema {
    kind: FacilityType::Server,
    title: "Data center",
    tick: ms(2000),
    signals: &[
        SignalSpec::walk("cpu", 42.0, 0.0, 100.0, 8.0),
        SignalSpec::walk("memory", 58.0, 0.0, 100.0, 5.0),
        SignalSpec::walk("bandwidth", 37.0, 0.0, 100.0, 8.0),
        SignalSpec::walk("latency", 4.0, 1.0, 100.0, 2.0),
        SignalSpec::walk("iops", 120_000.0, 0.0, 500_000.0, 15_000.0),
        SignalSpec::jitter("tempZone1", 20.0, 5.0),
        SignalSpec::jitter("tempZone2", 21.0, 5.0),
        SignalSpec::jitter("humidity", 40.0, 10.0),
    ],
    tabs: &[
        TabSpec {
            title: "Compute",
            widgets: &[
                gauge("CPU", "cpu", "%", 0.0, 100.0, PERCENT),
                gauge("Memory", "memory", "%", 0.0, 100.0, PERCENT),
                gauge("Bandwidth", "bandwidth", "%", 0.0, 100.0, PERCENT),
                alarm("Latency", "latency", "ms", 1, 20.0),
                display("IOPS", "iops", "", 0),
                led("Load", below("cpu", 90.0)),
            ],
        },
        TabSpec {
            title: "Cooling",
            widgets: &[
                alarm("Zone 1", "tempZone1", "°C", 1, 24.0),
                alarm("Zone 2", "tempZone2", "°C", 1, 25.0),
                display("Humidity", "humidity", "%", 0),
                led("Cooling", below("tempZone1", 24.0)),
            ],
        },
        TabSpec {
            title: "Clusters",
            widgets: &[
                toggle("clusterA", "Cluster A", true),
                toggle("clusterB", "Cluster B", true),
                toggle("clusterC", "Cluster C", false),
                toggle("clusterD", "Cluster D", true),
                led("Cluster A", switched("clusterA")),
                EMERGENCY_LED,
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("cpu", 0.0), ("bandwidth", 0.0)],
};

// ── University ───────────────────────────────────────────────────────

static UNIVERSITY: TerminalSchema = TerminalSchema {
    kind: FacilityType::University,
    title: "University campus",
    tick: ms(4000),
    signals: &[
        SignalSpec::walk("students", 8400.0, 0.0, 12000.0, 300.0),
        SignalSpec::walk("faculty", 380.0, 0.0, 500.0, 10.0),
        SignalSpec::walk("experiments", 23.0, 0.0, 80.0, 3.0),
        SignalSpec::walk("library", 410.0, 0.0, 800.0, 25.0),
        SignalSpec::walk("networkLoad", 47.0, 0.0, 100.0, 6.0),
    ],
    tabs: &[
        TabSpec {
            title: "Campus",
            widgets: &[
                display("Students", "students", "", 0),
                display("Faculty", "faculty", "", 0),
                display("Library visitors", "library", "", 0),
                gauge("Network load", "networkLoad", "%", 0.0, 100.0, PERCENT),
                toggle("mainBuilding", "Main building", true),
                toggle("lectureHalls", "Lecture halls", true),
                toggle("dormitories", "Dormitories", false),
            ],
        },
        TabSpec {
            title: "Research",
            widgets: &[
                display("Running experiments", "experiments", "", 0),
                toggle("physicsLab", "Physics lab", true),
                toggle("chemistryLab", "Chemistry lab", true),
                toggle("biologyLab", "Biology lab", false),
                led("Chemistry lab", switched("chemistryLab")),
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("experiments", 0.0)],
};

// ── Waterworks ───────────────────────────────────────────────────────

static WATER: TerminalSchema = TerminalSchema {
    kind: FacilityType::Water,
    title: "Waterworks control",
    tick: ms(3000),
    signals: &[
        SignalSpec::walk("flow", 1250.0, 0.0, 3000.0, 60.0),
        SignalSpec::walk("inletPressure", 4.2, 0.0, 10.0, 0.3),
        SignalSpec::walk("turbidity", 0.4, 0.0, 5.0, 0.1),
        SignalSpec::walk("ph", 7.2, 6.0, 8.5, 0.1),
        SignalSpec::walk("filterPressure", 1.8, 0.0, 5.0, 0.2),
        SignalSpec::walk("reservoir", 74.0, 0.0, 100.0, 2.0),
        SignalSpec::walk("outputPressure", 5.1, 0.0, 10.0, 0.3),
    ],
    tabs: &[
        TabSpec {
            title: "Intake",
            widgets: &[
                display("Flow", "flow", "m³/h", 0),
                display("Inlet pressure", "inletPressure", "bar", 1),
                alarm("Turbidity", "turbidity", "NTU", 2, 1.0),
                toggle("pump1", "Pump 1", true),
                toggle("pump2", "Pump 2", true),
                toggle("pump3", "Pump 3", true),
                toggle("pump4", "Pump 4", false),
            ],
        },
        TabSpec {
            title: "Treatment",
            widgets: &[
                display("pH", "ph", "", 2),
                display("Filter pressure", "filterPressure", "bar", 1),
                led("Water quality", between("ph", 6.5, 8.0)),
            ],
        },
        TabSpec {
            title: "Distribution",
            widgets: &[
                gauge("Reservoir", "reservoir", "%", 0.0, 100.0, FILL),
                display("Output pressure", "outputPressure", "bar", 1),
                led("Pump 1", switched("pump1")),
                EMERGENCY_LED,
                EMERGENCY_BUTTON,
            ],
        },
    ],
    emergency: &[("flow", 0.0), ("outputPressure", 0.0)],
};

// ── Lookup ───────────────────────────────────────────────────────────

pub static ALL_SCHEMAS: &[&TerminalSchema] = &[
    &POWER,
    &AIRPORT,
    &SERVER,
    &GOV,
    &WATER,
    &BASE,
    &HOSPITAL,
    &FIRE,
    &POLICE,
    &SCHOOL,
    &CITY_HALL,
    &BRIDGE,
    &PORT,
    &ENERGY,
    &METRO,
    &UNIVERSITY,
    &CONTROL,
];

pub fn schema_for(kind: FacilityType) -> &'static TerminalSchema {
    match kind {
        FacilityType::Power => &POWER,
        FacilityType::Airport => &AIRPORT,
        FacilityType::Server => &SERVER,
        FacilityType::Gov => &GOV,
        FacilityType::Water => &WATER,
        FacilityType::Base => &BASE,
        FacilityType::Hospital => &HOSPITAL,
        FacilityType::Fire => &FIRE,
        FacilityType::Police => &POLICE,
        FacilityType::School => &SCHOOL,
        FacilityType::CityHall => &CITY_HALL,
        FacilityType::Bridge => &BRIDGE,
        FacilityType::Port => &PORT,
        FacilityType::Energy => &ENERGY,
        FacilityType::Metro => &METRO,
        FacilityType::University => &UNIVERSITY,
        FacilityType::Control => &CONTROL,
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_type_has_a_valid_schema() {
        for kind in FacilityType::iter() {
            let schema = schema_for(kind);
            assert_eq!(schema.kind, kind);
            if let Err(e) = schema.validate() {
                panic!("{e}");
            }
        }
        assert_eq!(ALL_SCHEMAS.len(), FacilityType::iter().count());
    }

    #[test]
    fn tick_intervals_are_two_to_five_seconds() {
        for schema in ALL_SCHEMAS {
            let secs = schema.tick.as_secs();
            assert!((2..=5).contains(&secs), "{}: {secs}s", schema.kind);
        }
    }

    #[test]
    fn initial_values_sit_inside_their_ranges() {
        for schema in ALL_SCHEMAS {
            for s in schema.signals {
                assert!(
                    (s.min..=s.max).contains(&s.initial),
                    "{}.{} starts outside its range",
                    schema.kind,
                    s.key
                );
            }
        }
    }

    #[test]
    fn every_schema_offers_an_emergency_shutdown() {
        for schema in ALL_SCHEMAS {
            assert!(
                schema.widgets().any(|w| matches!(
                    w,
                    Widget::Button {
                        action: ButtonAction::EmergencyShutdown,
                        confirm: true,
                        ..
                    }
                )),
                "{} has no shutdown button",
                schema.kind
            );
        }
    }
}
