/// A recurring fasting protocol: label plus fasting window in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTemplate {
    pub label: &'static str,
    pub duration: u32,
}

pub const SESSION_CATALOG: [SessionTemplate; 5] = [
    SessionTemplate {
        label: "Daily 16:8 IF",
        duration: 16,
    },
    SessionTemplate {
        label: "Daily 18:6 IF",
        duration: 18,
    },
    SessionTemplate {
        label: "Daily 20:4 IF",
        duration: 20,
    },
    SessionTemplate {
        label: "Daily 22:2 IF",
        duration: 22,
    },
    SessionTemplate {
        label: "Daily OMAD (23:1)",
        duration: 23,
    },
];
