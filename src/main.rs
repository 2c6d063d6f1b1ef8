mod entry;
mod logger;

use bulkfetch::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
