// SSD1683 command definitions

// Initialization and reset
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01; // Driver output control
pub const SOFT_RESET: u8 = 0x12; // Soft reset
pub const TEMP_SENSOR_CONTROL: u8 = 0x18; // Temperature sensor selection
pub const BORDER_WAVEFORM: u8 = 0x3C; // Border waveform control

// RAM and window management
pub const DATA_ENTRY_MODE: u8 = 0x11; // Data entry mode
pub const SET_RAM_X_RANGE: u8 = 0x44; // RAM X start/end, in bytes
pub const SET_RAM_Y_RANGE: u8 = 0x45; // RAM Y start/end, in gates
pub const SET_RAM_X_COUNTER: u8 = 0x4E; // RAM X address counter
pub const SET_RAM_Y_COUNTER: u8 = 0x4F; // RAM Y address counter
pub const WRITE_RAM_BW: u8 = 0x24; // Write to BW RAM (new frame)
pub const WRITE_RAM_RED: u8 = 0x26; // Write to RED RAM (previous frame for partial)

// Display update and refresh
pub const MASTER_ACTIVATION: u8 = 0x20; // Master activation
pub const DISPLAY_UPDATE_CTRL1: u8 = 0x21; // Display update control 1
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22; // Display update control 2
pub const CTRL1_NORMAL: u8 = 0x00; // Compare RED vs BW (differential)
pub const CTRL1_BYPASS_RED: u8 = 0x40; // Bypass RED RAM as 0 (full refresh)
pub const CTRL1_SOURCE_RANGE: u8 = 0x00; // S0..S399, second CTRL1 byte

// CTRL2 sequences
pub const UPDATE_FULL: u8 = 0xF7; // clock+analog on, load temp/LUT mode 1, display, off
pub const UPDATE_PARTIAL: u8 = 0xFC; // clock+analog on, load temp/LUT mode 2, display
pub const UPDATE_POWER_OFF: u8 = 0x83; // analog and clock off

// Power management
pub const DEEP_SLEEP: u8 = 0x10; // Deep sleep

// Fixed init values for the GYE042A87 panel
pub const GATE_SCAN_G0_FIRST: u8 = 0x00; // third DRIVER_OUTPUT_CONTROL byte
pub const BORDER_FOLLOW_LUT_WHITE: u8 = 0x05;
pub const TEMP_SENSOR_INTERNAL: u8 = 0x80;
pub const DATA_ENTRY_X_INC_Y_INC: u8 = 0x03; // RAM window math relies on this
