/// Reference tuning values for Pong. Distances are in board pixels,
/// speeds in pixels per tick.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Board
    pub const BOARD_WIDTH: f32 = 1280.0;
    pub const BOARD_HEIGHT: f32 = 720.0;
    pub const WALL_THICKNESS: f32 = 5.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 40.0;
    pub const PADDLE_HEIGHT: f32 = 250.0;
    pub const PADDLE_SPEED: f32 = 10.0;
    pub const PADDLE_ROTATE_STEP: f32 = 5.0; // degrees per key press
    pub const PADDLE_SPIN: f32 = 10.0;
    pub const PADDLE_X_FRACTION: f32 = 0.1; // mirrored for the right paddle

    // Ball
    pub const BALL_DIAMETER: f32 = 40.0;
    pub const SERVE_SPEED: f32 = 15.0;

    // Physics
    pub const GRAVITY: f32 = 0.0981;

    // Score
    pub const WIN_SCORE: u32 = 7;

    // Loop
    pub const TICK_INTERVAL_MS: u64 = 10;
}
