// src/backend/utils/log.rs
// Canister debug output. The debug_print syscall only exists inside a canister,
// so native builds write to stdout/stderr instead.

#[cfg(target_arch = "wasm32")]
fn emit(line: String) {
    ic_cdk::println!("{}", line);
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(line: String) {
    println!("{}", line);
}

#[cfg(target_arch = "wasm32")]
fn emit_err(line: String) {
    ic_cdk::eprintln!("{}", line);
}

#[cfg(not(target_arch = "wasm32"))]
fn emit_err(line: String) {
    eprintln!("{}", line);
}

pub fn info(msg: impl AsRef<str>) {
    emit(format!("📝 INFO: {}", msg.as_ref()));
}

pub fn warn(msg: impl AsRef<str>) {
    emit(format!("⚠️ WARN: {}", msg.as_ref()));
}

pub fn error(msg: impl AsRef<str>) {
    emit_err(format!("🔥 ERROR: {}", msg.as_ref()));
}
