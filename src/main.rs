
use hyperdsm::Pipeline;

fn main() {
    Pipeline::run();
}
