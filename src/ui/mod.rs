// UI module - native dialog glue
//
// Rendering and layout are left to the toolkit; this module only contains the
// pieces the settings logic calls into:
// - NativeDialogs: blocking error message boxes for failed API reloads

pub mod dialogs;

pub use dialogs::NativeDialogs;
