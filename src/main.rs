use jing_wei::xboard;

fn main() {
    xboard::run_xboard();
}
