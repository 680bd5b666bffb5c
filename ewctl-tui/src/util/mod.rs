//！┌──────────────────────────────────────────────────────────────────────┐
//！│                        ewctl 的终端生命周期                             │
//！│                                                                      │
//！│   main.rs                                                            │
//！│     │  配置校验通过、执行器就绪                                        │
//！│     ▼                                                                │
//！│   init_terminal(ui.mouse) ──▶ raw mode + 备用屏幕 (+ 鼠标捕获)          │
//！│     │                                                                │
//！│     ▼                                                                │
//！│   app::run() ◀─────┐   draw → try_recv → poll(100ms) → dispatch      │
//！│     │              └──────────────────────────────────────┘          │
//！│     ▼  should_quit 或出错                                             │
//！│   restore_terminal() ──▶ 恢复行缓冲、离开备用屏幕、关闭鼠标捕获         │
//！└──────────────────────────────────────────────────────────────────────┘

//!
//! src/util/mod.rs
//! Util 层：终端的进入与退出
//!
//! ```text
//! init_terminal(mouse)
//!     · enable_raw_mode()                     关闭行缓冲与回显
//!     · EnterAlternateScreen                  切换到备用屏幕
//!     · EnableMouseCapture（可选）            ui.mouse 为真时开启
//!
//! restore_terminal(terminal)
//!     · 上述操作的逆序，无论主循环成功与否都要执行
//! ```
//!

mod terminal;

pub use terminal::{init_terminal, restore_terminal, Term};
