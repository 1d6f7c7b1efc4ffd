use std::thread::JoinHandle;

/// Named background thread that logs a panic instead of taking the
/// firmware down with it.
pub struct WorkerThread {
    name: &'static str,
    stack_kb: Option<usize>,
}

impl WorkerThread {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stack_kb: None,
        }
    }

    pub fn with_stack_size(mut self, stack_kb: usize) -> Self {
        self.stack_kb = Some(stack_kb);
        self
    }

    pub fn spawn<F>(self, func: F) -> std::io::Result<JoinHandle<()>>
    where
        F: FnOnce() + Send + 'static,
    {
        let Self { name, stack_kb } = self;

        // On ESP-IDF the std builder maps onto a FreeRTOS task, the stack size
        // is honoured, ThreadSpawnConfiguration is not needed.
        let mut builder = std::thread::Builder::new().name(name.to_string());
        if let Some(stack_kb) = stack_kb {
            builder = builder.stack_size(stack_kb * 1024);
        }

        builder.spawn(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(func));
            if let Err(err) = result {
                log::error!("Thread {name} panicked: {:?}", err);
            }
        })
    }
}

#[cfg(target_os = "espidf")]
pub fn debug_dump_stack_info() {
    let task_name =
        unsafe { std::ffi::CStr::from_ptr(esp_idf_hal::sys::pcTaskGetName(std::ptr::null_mut())) }
            .to_string_lossy();

    let free_stack = unsafe { esp_idf_hal::sys::uxTaskGetStackHighWaterMark(std::ptr::null_mut()) };
    log::info!("[{task_name}] Free stack: {free_stack}b");

    let free_heap = unsafe { esp_idf_hal::sys::xPortGetFreeHeapSize() };
    log::info!("[{task_name}] Free heap: {free_heap}b");
}
