use fs_sim_kit::{FsBackend, SimFS};

fn main() {
    // allocates the root directory `/` and returns a cursor positioned at it
    let mut fs = SimFS::new();
    let root = fs.mkfs().unwrap();

    // creates `/docs`
    fs.mkdir(root, "docs").unwrap();

    // `cd` doesn't change `root`, it returns a new cursor for `/docs`
    let docs = fs.cd(root, "docs").unwrap();

    // creates files `/docs/second.txt` and `/docs/first.txt`;
    // they are kept sorted whatever the creation order is
    fs.touch(docs, "second.txt").unwrap();
    fs.touch(docs, "first.txt").unwrap();
    assert!(fs.is_file(docs, "first.txt").unwrap());

    // creates file `/readme` next to `/docs`
    fs.touch(root, "readme").unwrap();

    println!("{}:", fs.pwd(docs).unwrap());
    print!("{}", fs.ls(docs, ".").unwrap());

    // `..` from `/docs` is the root: prints `docs/` and `readme`
    println!("{}:", fs.pwd(fs.cd(docs, "..").unwrap()).unwrap());
    print!("{}", fs.ls(docs, "..").unwrap());

    // removes `/docs` with both files
    let released = fs.rm(root, "docs").unwrap();
    println!("removed {} dir(s), {} file(s)", released.dirs, released.files);

    // the `docs` cursor points to a removed directory now
    assert!(fs.pwd(docs).is_err());

    // releases everything; every cursor becomes invalid until the next `mkfs()`
    fs.rmfs(root).unwrap();
    assert!(fs.ls(root, "").is_err());
}
