mod scenario;

mod state_finish;
mod state_send_body;
