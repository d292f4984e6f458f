// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über den Event-Bus und Embassy Channels
// (Effekt-Anfragen, Provisioning-Signal, Farb-Notifications).

pub mod button;
pub mod control;
pub mod effects;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use button::button_task;
pub use control::control_task;
pub use effects::effects_task;
pub use wifi::{connection_task, dhcp_task, net_task};
